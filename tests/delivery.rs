use pitch_tracker::export::{
    ClipboardSink, Delivery, DeliveryError, DeliveryOutcome, DownloadDir, DownloadSink, Payload,
    PayloadKind, ShareSink,
};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Default)]
struct Calls {
    shared: Vec<String>,
    copied: Vec<String>,
}

struct FakeShare {
    kinds: Vec<PayloadKind>,
    fail: bool,
    calls: Rc<RefCell<Calls>>,
}

impl ShareSink for FakeShare {
    fn accepts(&self, kind: PayloadKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn share(&mut self, payload: &Payload) -> Result<(), DeliveryError> {
        self.calls.borrow_mut().shared.push(payload.filename.clone());
        if self.fail {
            Err(DeliveryError::Share("cancelled".into()))
        } else {
            Ok(())
        }
    }
}

struct FakeClipboard {
    fail: bool,
    calls: Rc<RefCell<Calls>>,
}

impl ClipboardSink for FakeClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "blocked",
            )));
        }
        self.calls.borrow_mut().copied.push(text.to_string());
        Ok(())
    }
}

struct BrokenDownload;

impl DownloadSink for BrokenDownload {
    fn save(&mut self, _filename: &str, _body: &str) -> Result<PathBuf, DeliveryError> {
        Err(DeliveryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

fn download(dir: &tempfile::TempDir) -> Box<DownloadDir> {
    Box::new(DownloadDir::new(dir.path()))
}

#[test]
fn csv_goes_to_capable_share_sink() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut delivery = Delivery::new(download(&dir)).with_share(Box::new(FakeShare {
        kinds: vec![PayloadKind::Csv],
        fail: false,
        calls: calls.clone(),
    }));

    let outcome = delivery.deliver_csv("s-2024-05-01.csv", "Pitch #");
    assert_eq!(outcome, DeliveryOutcome::ShareOpened);
    assert_eq!(calls.borrow().shared, vec!["s-2024-05-01.csv".to_string()]);
    assert!(!dir.path().join("s-2024-05-01.csv").exists());
}

#[test]
fn csv_skips_share_sink_that_cannot_take_it() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut delivery = Delivery::new(download(&dir)).with_share(Box::new(FakeShare {
        kinds: vec![PayloadKind::Text],
        fail: false,
        calls: calls.clone(),
    }));

    let outcome = delivery.deliver_csv("s.csv", "a,b");
    let path = dir.path().join("s.csv");
    assert_eq!(outcome, DeliveryOutcome::DownloadedCsv(path.clone()));
    assert!(calls.borrow().shared.is_empty());
    assert_eq!(fs::read_to_string(path).unwrap(), "a,b");
}

#[test]
fn failed_share_falls_back_to_download() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut delivery = Delivery::new(download(&dir)).with_share(Box::new(FakeShare {
        kinds: vec![PayloadKind::Csv],
        fail: true,
        calls: calls.clone(),
    }));

    let outcome = delivery.deliver_csv("s.csv", "a,b");
    assert_eq!(outcome, DeliveryOutcome::DownloadedCsv(dir.path().join("s.csv")));
    assert_eq!(calls.borrow().shared.len(), 1);
}

#[test]
fn summary_copies_when_clipboard_works() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut delivery = Delivery::new(download(&dir)).with_clipboard(Box::new(FakeClipboard {
        fail: false,
        calls: calls.clone(),
    }));

    assert_eq!(delivery.deliver_summary("report"), DeliveryOutcome::SummaryCopied);
    assert_eq!(calls.borrow().copied, vec!["report".to_string()]);
}

#[test]
fn blocked_clipboard_downloads_summary() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut delivery = Delivery::new(download(&dir)).with_clipboard(Box::new(FakeClipboard {
        fail: true,
        calls,
    }));

    let path = dir.path().join("pitch-summary.txt");
    assert_eq!(
        delivery.deliver_summary("report"),
        DeliveryOutcome::ClipboardBlockedDownloaded(path.clone())
    );
    assert_eq!(fs::read_to_string(path).unwrap(), "report");
}

#[test]
fn no_clipboard_downloads_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut delivery = Delivery::new(download(&dir));
    assert_eq!(
        delivery.deliver_summary("report"),
        DeliveryOutcome::DownloadedSummary(dir.path().join("pitch-summary.txt"))
    );
}

#[test]
fn download_failure_is_reported_not_raised() {
    let mut delivery = Delivery::new(Box::new(BrokenDownload));
    assert!(matches!(
        delivery.deliver_csv("s.csv", "x"),
        DeliveryOutcome::Failed(_)
    ));
    assert!(matches!(
        delivery.deliver_summary("x"),
        DeliveryOutcome::Failed(_)
    ));
}
