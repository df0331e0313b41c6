/// How a `BooleanQuery` clause participates in matching (§4.3
/// "Intersection / Union / AndNot").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// The clause may match; at least one `Should` clause must match
    /// unless the query also has `Must`/`MustNot` clauses.
    Should,
    /// The clause must match every returned doc (AND).
    Must,
    /// The clause must not match any returned doc (AND NOT).
    MustNot,
}
