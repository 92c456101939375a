// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

/// Combined language hint handed to the recognition engine; covers both
/// supported receipt languages without per-scan selection.
pub const COMBINED_LANGUAGES: &str = "eng+chi_tra";

/// External recognition engine boundary: image plus language hint in, raw
/// recognized text out, with coarse progress callbacks along the way.
pub trait Recognizer {
    fn recognize(
        &mut self,
        image: &Path,
        languages: &str,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Uninitialized,
    Initializing,
    Ready,
    Terminated,
}

/// Explicitly owned handle around at most one live recognizer. Acquiring
/// tears down any prior instance; a failed recognition releases the worker
/// and surfaces the error with no automatic retry.
pub struct OcrWorker {
    state: WorkerState,
    recognizer: Option<Box<dyn Recognizer>>,
}

impl OcrWorker {
    pub fn new() -> Self {
        OcrWorker {
            state: WorkerState::Uninitialized,
            recognizer: None,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn acquire<F>(&mut self, init: F) -> Result<()>
    where
        F: FnOnce() -> Result<Box<dyn Recognizer>>,
    {
        if self.recognizer.is_some() {
            self.release();
        }
        self.state = WorkerState::Initializing;
        match init() {
            Ok(recognizer) => {
                self.recognizer = Some(recognizer);
                self.state = WorkerState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = WorkerState::Uninitialized;
                Err(e)
            }
        }
    }

    pub fn recognize(
        &mut self,
        image: &Path,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<String> {
        if self.state != WorkerState::Ready {
            return Err(anyhow!("OCR worker is not ready (state {:?})", self.state));
        }
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or_else(|| anyhow!("OCR worker has no recognizer"))?;
        match recognizer.recognize(image, COMBINED_LANGUAGES, on_progress) {
            Ok(text) => Ok(text),
            Err(e) => {
                // Fail closed; the caller re-triggers manually if desired.
                self.release();
                Err(e)
            }
        }
    }

    pub fn release(&mut self) {
        self.recognizer = None;
        self.state = WorkerState::Terminated;
    }
}

impl Default for OcrWorker {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognizer backed by a locally installed `tesseract` executable.
pub struct TesseractCli {
    binary: String,
}

impl TesseractCli {
    pub fn new(binary: impl Into<String>) -> Self {
        TesseractCli {
            binary: binary.into(),
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl Recognizer for TesseractCli {
    fn recognize(
        &mut self,
        image: &Path,
        languages: &str,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<String> {
        on_progress(0);
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(languages)
            .output()
            .with_context(|| format!("Run OCR binary '{}'", self.binary))?;
        if !output.status.success() {
            return Err(anyhow!(
                "OCR binary exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        on_progress(100);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
