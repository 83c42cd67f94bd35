use tandem_shared::{TransactionId, UndoHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoStep {
    Undo,
    Redo,
    EndCurrent,
}

/// A linear undo buffer that records every step taken on it
#[derive(Debug, Default)]
pub struct TestUndoHistory {
    pub transactions: Vec<TransactionId>,
    pub undo_count: usize,
    pub squelched: bool,
    /// Every squelch value set, in order
    pub squelch_log: Vec<bool>,
    pub steps: Vec<UndoStep>,
}

impl TestUndoHistory {
    pub fn new(transactions: Vec<TransactionId>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    pub fn undo_steps(&self) -> usize {
        self.steps.iter().filter(|step| **step == UndoStep::Undo).count()
    }

    pub fn redo_steps(&self) -> usize {
        self.steps.iter().filter(|step| **step == UndoStep::Redo).count()
    }
}

impl UndoHistory for TestUndoHistory {
    fn find_transaction_index(&self, transaction_id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|id| id == transaction_id)
    }

    fn queue_length(&self) -> usize {
        self.transactions.len()
    }

    fn undo_count(&self) -> usize {
        self.undo_count
    }

    fn undo(&mut self) -> bool {
        if self.undo_count >= self.transactions.len() {
            return false;
        }
        self.undo_count += 1;
        self.steps.push(UndoStep::Undo);
        true
    }

    fn redo(&mut self) -> bool {
        if self.undo_count == 0 {
            return false;
        }
        self.undo_count -= 1;
        self.steps.push(UndoStep::Redo);
        true
    }

    fn end_current(&mut self) {
        self.steps.push(UndoStep::EndCurrent);
    }

    fn set_squelch_notifications(&mut self, squelch: bool) -> bool {
        self.squelch_log.push(squelch);
        std::mem::replace(&mut self.squelched, squelch)
    }
}
