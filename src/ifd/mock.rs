//! ifd::mock
//!
//! Recording collaborators for deterministic tests.
//!
//! # Example
//!
//! ```
//! use aovkit::core::aov::Aov;
//! use aovkit::core::types::VexType;
//! use aovkit::ifd::mock::{RecordingReporter, RecordingStream};
//! use aovkit::ifd::{IfdWriter, NoHooks, StaticScene};
//!
//! let mut stream = RecordingStream::new();
//! let mut hooks = NoHooks;
//! let mut reporter = RecordingReporter::default();
//!
//! let aov = Aov::builder("N", VexType::Vector).build();
//! IfdWriter::new(&mut stream, &mut hooks, &mut reporter)
//!     .write_aov(&aov, &StaticScene::default(), 0.0)
//!     .unwrap();
//!
//! assert_eq!(stream.planes()[0].get("channel"), Some("N"));
//! ```

use std::collections::HashSet;

use super::traits::{ErrorReporter, PlaneHookArgs, PlaneHooks, SceneStream};
use super::IfdError;

/// A call received by [`RecordingStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Start(String),
    Property {
        block: String,
        name: String,
        values: Vec<String>,
    },
    End,
}

/// Properties of one recorded block, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedBlock {
    pub block: String,
    pub properties: Vec<(String, String)>,
}

impl RecordedBlock {
    /// First value of a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Scene stream that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingStream {
    pub events: Vec<StreamEvent>,
    fail_after: Option<usize>,
}

impl RecordingStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call once `count` calls have been recorded.
    pub fn failing_after(count: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(count),
        }
    }

    /// Recorded blocks, whether or not they were ended.
    pub fn planes(&self) -> Vec<RecordedBlock> {
        let mut blocks = Vec::new();
        for event in &self.events {
            match event {
                StreamEvent::Start(block) => blocks.push(RecordedBlock {
                    block: block.clone(),
                    properties: Vec::new(),
                }),
                StreamEvent::Property { name, values, .. } => {
                    if let Some(current) = blocks.last_mut() {
                        current
                            .properties
                            .push((name.clone(), values.first().cloned().unwrap_or_default()));
                    }
                }
                StreamEvent::End => {}
            }
        }
        blocks
    }

    pub fn starts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Start(_)))
            .count()
    }

    /// True if every started block was ended.
    pub fn is_balanced(&self) -> bool {
        let ends = self
            .events
            .iter()
            .filter(|e| matches!(e, StreamEvent::End))
            .count();
        ends == self.starts()
    }

    fn record(&mut self, event: StreamEvent) -> Result<(), IfdError> {
        if self.fail_after.is_some_and(|limit| self.events.len() >= limit) {
            return Err(IfdError::Stream("recording stream closed".into()));
        }
        self.events.push(event);
        Ok(())
    }
}

impl SceneStream for RecordingStream {
    fn start(&mut self, block: &str) -> Result<(), IfdError> {
        self.record(StreamEvent::Start(block.to_string()))
    }

    fn property(&mut self, block: &str, name: &str, values: &[&str]) -> Result<(), IfdError> {
        self.record(StreamEvent::Property {
            block: block.to_string(),
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    fn end(&mut self) -> Result<(), IfdError> {
        self.record(StreamEvent::End)
    }
}

/// Error reporter that keeps messages.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub errors: Vec<String>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&mut self, error: &IfdError) {
        self.errors.push(error.to_string());
    }
}

/// Hooks that veto chosen variables and log every call as `"pre X"` / `"post X"`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHooks {
    skip_pre: HashSet<String>,
    skip_post: HashSet<String>,
    pub calls: Vec<String>,
}

impl ScriptedHooks {
    pub fn skip_pre(mut self, variable: &str) -> Self {
        self.skip_pre.insert(variable.to_string());
        self
    }

    pub fn skip_post(mut self, variable: &str) -> Self {
        self.skip_post.insert(variable.to_string());
        self
    }
}

impl PlaneHooks for ScriptedHooks {
    fn pre_defplane(&mut self, args: &PlaneHookArgs<'_>) -> bool {
        self.calls.push(format!("pre {}", args.variable));
        self.skip_pre.contains(args.variable)
    }

    fn post_defplane(&mut self, args: &PlaneHookArgs<'_>) -> bool {
        self.calls.push(format!("post {}", args.variable));
        self.skip_post.contains(args.variable)
    }
}
