use crate::schema::{Document, Term};
use crate::Opstamp;

/// One document submitted to an `IndexWriter`, stamped with the opstamp
/// that orders it relative to every other operation in the same
/// writer session (§3 "Lifecycle").
#[derive(Debug)]
pub struct AddOperation {
    pub opstamp: Opstamp,
    pub document: Document,
}

/// A delete-by-term request, stamped the same way an add is. Deletes
/// apply to every segment a term appears in regardless of which
/// segment was open when the delete was issued (§4.2 "Deletion
/// representation").
#[derive(Debug, Clone)]
pub struct DeleteOperation {
    pub opstamp: Opstamp,
    pub term: Term,
}

/// Either kind of operation a writer thread drains from the shared
/// queue, in submission order.
#[derive(Debug)]
pub enum IndexingOperation {
    Add(AddOperation),
    Delete(DeleteOperation),
}
