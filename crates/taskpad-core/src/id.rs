use uuid::Uuid;

/// Source of fresh task identifiers, used only at creation time. A trait so
/// tests can pin the generated id.
pub trait IdSource {
    fn next_id(&self) -> Uuid;
}

/// Random v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
