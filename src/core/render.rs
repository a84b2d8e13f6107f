//! Render sink contract: where derived views leave the core

use crate::core::entity::{Entity, Listing};
use crate::core::scroll::ScrollStyle;
use serde::Serialize;

/// Metadata rendered alongside a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderMeta {
    /// No entity matched (or the collection is empty)
    pub is_empty: bool,

    /// The last fetch failed; the entries shown are from an earlier fetch
    pub unavailable: bool,

    /// The normalized query the view was filtered with
    pub query: String,
}

/// Consumer of derived views.
///
/// A sink only ever receives fully recomputed views; it never sees a view
/// that predates the last store or query change.
pub trait RenderSink {
    fn render(&mut self, view: &[&Entity], meta: &RenderMeta);

    /// Called when the navigation bar style flips
    fn scroll_style(&mut self, _style: ScrollStyle) {}
}

impl<F> RenderSink for F
where
    F: FnMut(&[&Entity], &RenderMeta),
{
    fn render(&mut self, view: &[&Entity], meta: &RenderMeta) {
        self(view, meta)
    }
}

/// One rendered view, reduced to ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub ids: Vec<String>,
    pub meta: RenderMeta,
}

/// Sink that records every frame and style change, for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
    styles: Vec<ScrollStyle>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn styles(&self) -> &[ScrollStyle] {
        &self.styles
    }
}

impl RenderSink for FrameRecorder {
    fn render(&mut self, view: &[&Entity], meta: &RenderMeta) {
        self.frames.push(Frame {
            ids: view.iter().map(|e| e.id().to_string()).collect(),
            meta: meta.clone(),
        });
    }

    fn scroll_style(&mut self, style: ScrollStyle) {
        self.styles.push(style);
    }
}
