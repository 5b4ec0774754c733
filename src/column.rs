/// Metadata of one result column, shared by every row of a result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub nullable: bool,
    /// Type name declared by the server for this column, if any.
    pub declared_class_name: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, nullable: bool, declared_class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable,
            declared_class_name: declared_class_name.into(),
        }
    }

    /// Descriptor for a column whose type the server does not report.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, true, "Any")
    }
}
