#![forbid(unsafe_code)]

//! Undo log for changes made to a host document.
//!
//! Every mutation the page layer makes outside its own listeners (a class on
//! `<body>`, an injected `<style>`, the scroll widgets) registers its undo
//! step here right after it succeeds. Dropping the log, including on an early
//! `?` return halfway through attachment, undoes every recorded step in
//! reverse order, so a failed attach leaves the document as it found it.

use crate::trace;

type Step = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Teardown {
    steps: Vec<(&'static str, Step)>,
}

impl Teardown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the undo step for a mutation that just took effect.
    pub fn push(&mut self, label: &'static str, undo: impl FnOnce() + 'static) {
        self.steps.push((label, Box::new(undo)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Undo everything recorded so far, newest first. The log is empty
    /// afterwards.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn run(&mut self) {
        while let Some((label, undo)) = self.steps.pop() {
            trace!(label, "undoing page mutation");
            undo();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|(label, _)| label))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Step) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let step = move |label: &'static str| -> Step {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(label))
        };
        (log, step)
    }

    /// Attachment sequence that stops at the first failing stage, the way
    /// `?` does in the host.
    fn attach_until(
        fail_at: Option<usize>,
        teardown: &mut Teardown,
        step: &impl Fn(&'static str) -> Step,
    ) -> Result<(), &'static str> {
        let stages = [
            "ready class",
            "stylesheet",
            "image observer",
            "progress bar",
            "back-to-top",
        ];
        for (index, label) in stages.into_iter().enumerate() {
            if fail_at == Some(index) {
                return Err(label);
            }
            // The image observer adds nothing to the document.
            if label != "image observer" {
                teardown.push(label, step(label));
            }
        }
        Ok(())
    }

    #[test]
    fn failed_attach_undoes_earlier_mutations() {
        let (log, step) = recorder();
        let result = {
            let mut teardown = Teardown::new();
            attach_until(Some(2), &mut teardown, &step)
        };
        assert_eq!(result, Err("image observer"));
        assert_eq!(*log.borrow(), vec!["stylesheet", "ready class"]);
    }

    #[test]
    fn failure_after_partial_widgets_removes_them_too() {
        let (log, step) = recorder();
        {
            let mut teardown = Teardown::new();
            assert!(attach_until(Some(4), &mut teardown, &step).is_err());
            assert_eq!(teardown.len(), 3);
        }
        assert_eq!(*log.borrow(), vec!["progress bar", "stylesheet", "ready class"]);
    }

    #[test]
    fn retry_after_failure_starts_clean() {
        let (log, step) = recorder();
        {
            let mut teardown = Teardown::new();
            assert!(attach_until(Some(2), &mut teardown, &step).is_err());
        }
        let mut teardown = Teardown::new();
        assert!(attach_until(None, &mut teardown, &step).is_ok());
        // Only the first attempt's mutations were undone; the second holds
        // exactly one of each.
        assert_eq!(*log.borrow(), vec!["stylesheet", "ready class"]);
        assert_eq!(teardown.len(), 4);
    }

    #[test]
    fn run_is_idempotent() {
        let (log, step) = recorder();
        let mut teardown = Teardown::new();
        teardown.push("a", step("a"));
        teardown.push("b", step("b"));
        teardown.run();
        teardown.run();
        drop(teardown);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn debug_lists_labels() {
        let mut teardown = Teardown::new();
        teardown.push("stylesheet", || {});
        assert_eq!(format!("{teardown:?}"), r#"["stylesheet"]"#);
        assert!(!teardown.is_empty());
    }
}
