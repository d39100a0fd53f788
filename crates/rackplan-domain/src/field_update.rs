/// Three-state update for optional fields.
///
/// - `NoChange`: field keeps its existing value
/// - `Set(value)`: field is updated to the provided value
/// - `Clear`: field is cleared (set to None)
///
/// # Example
///
/// ```
/// use rackplan_domain::FieldUpdate;
///
/// let notes = FieldUpdate::Set("Cold aisle".to_string());
/// let colour: FieldUpdate<String> = FieldUpdate::Clear;
/// assert!(notes.is_change());
/// assert!(colour.is_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T: Clone> FieldUpdate<T> {
    /// Apply this update to an optional field
    ///
    /// ```
    /// use rackplan_domain::FieldUpdate;
    ///
    /// let mut field = Some("old".to_string());
    /// FieldUpdate::Set("new".to_string()).apply_to(&mut field);
    /// assert_eq!(field, Some("new".to_string()));
    ///
    /// FieldUpdate::Clear.apply_to(&mut field);
    /// assert_eq!(field, None);
    /// ```
    pub fn apply_to(&self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value.clone()),
            FieldUpdate::Clear => *field = None,
        }
    }

    /// The update that would restore `current` if this update were applied.
    pub fn capture(&self, current: &Option<T>) -> FieldUpdate<T> {
        if self.is_change() {
            FieldUpdate::from(current.clone())
        } else {
            FieldUpdate::NoChange
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some(value)` becomes `Set(value)`, `None` becomes `Clear`.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}
