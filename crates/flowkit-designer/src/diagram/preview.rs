//! Live previews for pointer drags.
//!
//! While a preview runs, mutators apply their changes without recording
//! them and the model remembers the original contents of every item it
//! touches. The drag then either commits, recording one undo group with the
//! net change per item, or cancels, restoring the originals.

use tracing::trace;

use super::Diagram;
use crate::commands::DiagramCommand;
use crate::history::ActionCode;

impl Diagram {
    pub fn begin_preview(&mut self) {
        if self.model.is_capturing() {
            return;
        }
        self.model.start_capture();
        self.history.set_skip(true);
    }

    pub fn is_previewing(&self) -> bool {
        self.model.is_capturing()
    }

    /// Restores every item touched since `begin_preview`.
    pub fn cancel_preview(&mut self) -> bool {
        let Some(capture) = self.model.take_capture() else {
            return false;
        };
        self.history.set_skip(self.skip_undo);
        for id in capture.order.iter().rev() {
            if let Some(original) = capture.originals.get(id) {
                let original = original.clone();
                self.model.update_item(*id, |kind| *kind = original);
            }
        }
        trace!(items = capture.order.len(), "Preview cancelled");
        self.flush();
        true
    }

    /// Records the net change of the preview as one undo group under `code`.
    /// Returns the number of tasks recorded.
    pub fn commit_preview(&mut self, code: ActionCode) -> usize {
        let Some(capture) = self.model.take_capture() else {
            return 0;
        };
        self.history.set_skip(self.skip_undo);

        let opened = self.history.begin_implicit(code);
        let mut recorded = 0;
        for id in &capture.order {
            let (Some(original), Some(current)) =
                (capture.originals.get(id), self.model.get(*id))
            else {
                continue;
            };
            for command in DiagramCommand::diff(*id, original, &current.kind) {
                if self.history.submit(command) {
                    recorded += 1;
                }
            }
        }
        self.history.end_implicit(opened);
        trace!(recorded, code = %code, "Preview committed");
        self.flush();
        recorded
    }
}
