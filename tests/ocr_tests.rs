// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use std::path::Path;

use ledgerclip::ocr::{OcrWorker, Recognizer, WorkerState, COMBINED_LANGUAGES};

struct FakeRecognizer {
    text: &'static str,
    fail: bool,
}

impl Recognizer for FakeRecognizer {
    fn recognize(
        &mut self,
        _image: &Path,
        languages: &str,
        on_progress: &mut dyn FnMut(u8),
    ) -> anyhow::Result<String> {
        assert_eq!(languages, COMBINED_LANGUAGES);
        on_progress(100);
        if self.fail {
            return Err(anyhow!("recognizer exploded"));
        }
        Ok(self.text.to_string())
    }
}

#[test]
fn worker_walks_the_lifecycle_states() {
    let mut worker = OcrWorker::new();
    assert_eq!(worker.state(), WorkerState::Uninitialized);

    worker
        .acquire(|| {
            Ok(Box::new(FakeRecognizer {
                text: "Total 5.00",
                fail: false,
            }))
        })
        .unwrap();
    assert_eq!(worker.state(), WorkerState::Ready);

    let mut last_progress = 0u8;
    let text = worker
        .recognize(Path::new("receipt.png"), &mut |p| last_progress = p)
        .unwrap();
    assert_eq!(text, "Total 5.00");
    assert_eq!(last_progress, 100);

    worker.release();
    assert_eq!(worker.state(), WorkerState::Terminated);
    assert!(worker
        .recognize(Path::new("receipt.png"), &mut |_| {})
        .is_err());
}

#[test]
fn failed_recognition_releases_the_worker() {
    let mut worker = OcrWorker::new();
    worker
        .acquire(|| {
            Ok(Box::new(FakeRecognizer {
                text: "",
                fail: true,
            }))
        })
        .unwrap();

    assert!(worker
        .recognize(Path::new("receipt.png"), &mut |_| {})
        .is_err());
    // No retry: the worker fails closed until explicitly re-acquired.
    assert_eq!(worker.state(), WorkerState::Terminated);
}

#[test]
fn failed_acquire_leaves_no_instance() {
    let mut worker = OcrWorker::new();
    let result = worker.acquire(|| Err(anyhow!("no engine installed")));
    assert!(result.is_err());
    assert_eq!(worker.state(), WorkerState::Uninitialized);
}

#[test]
fn acquire_replaces_any_prior_instance() {
    let mut worker = OcrWorker::new();
    worker
        .acquire(|| {
            Ok(Box::new(FakeRecognizer {
                text: "first",
                fail: false,
            }))
        })
        .unwrap();
    worker
        .acquire(|| {
            Ok(Box::new(FakeRecognizer {
                text: "second",
                fail: false,
            }))
        })
        .unwrap();

    let text = worker
        .recognize(Path::new("receipt.png"), &mut |_| {})
        .unwrap();
    assert_eq!(text, "second");
}
