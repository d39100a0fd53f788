/// A partial view of an entity that can be read from it and written back.
///
/// Reversible edits rely on `capture` producing exactly the fields a later
/// `apply_to` would touch, so the pair can restore the entity.
pub trait Editable<T> {
    /// Capture the current value of every field `changes` would write.
    fn capture(entity: &T, changes: &Self) -> Self;

    /// Write the present fields onto the entity.
    fn apply_to(&self, entity: &mut T);

    /// True when no field is set.
    fn is_empty(&self) -> bool;
}
