use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Outcome of an idempotent create. Both variants carry the row the client's
/// request token now maps to, so the handler can respond identically apart
/// from the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<T> {
    /// The insert won; this call created the row.
    Created(T),
    /// A previous submission with the same request token already created the
    /// row; this call fetched it instead.
    AlreadyExists(T),
}

impl<T> CreateOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            CreateOutcome::Created(row) | CreateOutcome::AlreadyExists(row) => row,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Run `insert`; if it loses the race on the request-token uniqueness
/// constraint named by `constraint`, fall back to `fetch` and report
/// [`CreateOutcome::AlreadyExists`].
///
/// The store's unique index is the serialization point: two submissions
/// carrying the same token race at the insert, the first writer wins, and the
/// loser observes the constraint violation. Unique violations on any other
/// constraint, and every other failure, propagate unchanged.
pub fn insert_or_fetch<Conn, T, I, F>(
    conn: &mut Conn,
    constraint: &str,
    insert: I,
    fetch: F,
) -> Result<CreateOutcome<T>, DieselError>
where
    I: FnOnce(&mut Conn) -> Result<T, DieselError>,
    F: FnOnce(&mut Conn) -> Result<T, DieselError>,
{
    match insert(conn) {
        Ok(row) => Ok(CreateOutcome::Created(row)),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info))
            if is_constraint_violation(constraint, &**info) =>
        {
            fetch(conn).map(CreateOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

fn is_constraint_violation(
    constraint: &str,
    info: &(dyn DatabaseErrorInformation + Send + Sync),
) -> bool {
    match info.constraint_name() {
        Some(name) => name == constraint,
        // Some backends only surface the constraint in the message text.
        None => info.message().contains(constraint),
    }
}
