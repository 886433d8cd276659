use danglescan::reporting::{versioned_path, write_danger_report, write_outputs};
use danglescan::{ResultSet, ScanResult, Trigger};
use tempfile::tempdir;

fn sample() -> ResultSet {
    let mut risky = ScanResult::unresolved("shop.example.com");
    risky.cname = Some("shop.myshopify.com".into());
    risky.takeover_risk = true;
    risky.trigger = Some(Trigger::Fingerprint("Shopify".into()));
    risky.http_status = Some(200);
    risky.final_url = Some("https://shop.example.com/".into());

    let mut risky_down = risky.clone();
    risky_down.hostname = "down.example.com".into();
    risky_down.http_status = None;
    risky_down.final_url = None;

    ResultSet::from(vec![risky, risky_down, ScanResult::unresolved("safe.example.com")])
}

#[test]
fn test_versioned_paths_never_overwrite() {
    let dir = tempdir().unwrap();

    let first = write_outputs(&sample(), dir.path()).unwrap();
    let second = write_outputs(&sample(), dir.path()).unwrap();

    assert_eq!(first.danger, dir.path().join("danger_only.txt"));
    assert_eq!(second.danger, dir.path().join("danger_only1.txt"));
    assert_eq!(second.csv, dir.path().join("all_results1.csv"));
    assert_eq!(
        versioned_path(dir.path(), "all_results", "json"),
        dir.path().join("all_results2.json")
    );
}

#[test]
fn test_danger_report_only_risk_and_200() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("danger.txt");

    let written = write_danger_report(&path, &sample()).unwrap();

    assert_eq!(written, 1);
    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        body,
        "shop.example.com → shop.myshopify.com | Status: 200 | Final URL: https://shop.example.com/\n"
    );
}

#[test]
fn test_csv_keeps_every_row() {
    let dir = tempdir().unwrap();
    let paths = write_outputs(&sample(), dir.path()).unwrap();

    let mut reader = csv::Reader::from_path(&paths.csv).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 3);
    // sorted by hostname
    assert_eq!(&rows[0][0], "down.example.com");
    assert_eq!(&rows[0][5], "true");
    assert_eq!(&rows[0][3], "");
    assert_eq!(&rows[1][0], "safe.example.com");
    assert_eq!(&rows[2][6], "fingerprint:Shopify");
}
