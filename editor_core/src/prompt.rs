//! Hook invoked by a front end's prompt loop after every key.

use crate::editor::Editor;
use crate::key::Key;

/// Receives the prompt input and the key that last changed it.
///
/// Called after every key, including the Escape or Enter that ends the
/// prompt, so implementations can clean up on the final call.
pub trait PromptCallback {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key);
}

impl<F> PromptCallback for F
where
    F: FnMut(&mut Editor, &str, Key),
{
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key) {
        self(editor, input, key)
    }
}
