//! Pet repository: SQL statements over the `pets` table.
//!
//! # Responsibility
//! - Build SELECT/INSERT/UPDATE/DELETE statements from typed inputs.
//! - Prepare lazy queries whose rows are pulled on demand.
//! - Reject connections whose schema was never bootstrapped.
//!
//! # Invariants
//! - Writes here do not validate; callers validate before dispatch.
//! - Empty value maps never reach storage.
//! - Selection clauses use plain `?` placeholders, bound in order.

use crate::contract::{PetColumn, TABLE_NAME};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::pet::{Pet, PetId, PetRow, PetValues};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row, Rows, Statement};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid pet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filter: a SQL `WHERE` fragment plus its bound arguments.
///
/// An empty clause matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter with a caller-written clause such as `breed = ? AND weight > ?`.
    pub fn new(clause: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        let clause = clause.into();
        let clause = if clause.trim().is_empty() {
            None
        } else {
            Some(clause)
        };
        Self {
            clause,
            args: args.into_iter().collect(),
        }
    }

    /// Filter matching exactly one row by `_id`.
    pub fn by_id(id: PetId) -> Self {
        Self::new(
            format!("{} = ?", PetColumn::Id.as_str()),
            [Value::Integer(id)],
        )
    }

    pub fn is_all(&self) -> bool {
        self.clause.is_none()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    fn where_sql(&self) -> String {
        match &self.clause {
            Some(clause) => format!(" WHERE ({clause})"),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordered list of sort keys. Empty means storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    keys: Vec<(PetColumn, SortDirection)>,
}

impl SortOrder {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn asc(mut self, column: PetColumn) -> Self {
        self.keys.push((column, SortDirection::Asc));
        self
    }

    pub fn desc(mut self, column: PetColumn) -> Self {
        self.keys.push((column, SortDirection::Desc));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn order_by_sql(&self) -> String {
        if self.keys.is_empty() {
            return String::new();
        }
        let keys = self
            .keys
            .iter()
            .map(|(column, direction)| match direction {
                SortDirection::Asc => format!("{} ASC", column.as_str()),
                SortDirection::Desc => format!("{} DESC", column.as_str()),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(" ORDER BY {keys}")
    }
}

/// Prepared SELECT whose rows are produced lazily.
///
/// The statement can be run again with [`PreparedQuery::rows`] to observe
/// the latest table contents.
pub struct PreparedQuery<'conn> {
    stmt: Statement<'conn>,
    args: Vec<Value>,
    projection: Vec<PetColumn>,
}

impl PreparedQuery<'_> {
    /// Columns produced by each row, in order.
    pub fn projection(&self) -> &[PetColumn] {
        &self.projection
    }

    /// Runs the statement and returns a lazy row iterator.
    pub fn rows(&mut self) -> RepoResult<PetRows<'_>> {
        let rows = self.stmt.query(params_from_iter(self.args.iter()))?;
        Ok(PetRows {
            rows,
            projection: &self.projection,
        })
    }

    /// Runs the statement and collects every row.
    pub fn collect_rows(&mut self) -> RepoResult<Vec<PetRow>> {
        self.rows()?.collect()
    }

    /// Runs the statement and collects full records.
    ///
    /// # Errors
    /// - `InvalidData` when the projection does not include every column.
    pub fn collect_pets(&mut self) -> RepoResult<Vec<Pet>> {
        self.rows()?
            .map(|row| {
                row?.into_pet().ok_or_else(|| {
                    RepoError::InvalidData("projection does not include every column".to_string())
                })
            })
            .collect()
    }
}

/// Lazy iterator over projected rows.
pub struct PetRows<'q> {
    rows: Rows<'q>,
    projection: &'q [PetColumn],
}

impl Iterator for PetRows<'_> {
    type Item = RepoResult<PetRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(parse_pet_row(row, self.projection).map_err(RepoError::from)),
            Ok(None) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Wraps a connection already bootstrapped by `PetDbHelper`.
    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking that its schema is bootstrapped.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `pets` layout.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE_NAME});"))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(TABLE_NAME));
        }
        for column in PetColumn::ALL {
            if !columns.iter().any(|name| name == column.as_str()) {
                return Err(RepoError::MissingRequiredColumn {
                    table: TABLE_NAME,
                    column: column.as_str(),
                });
            }
        }

        Ok(Self { conn })
    }

    /// Prepares a projected, filtered and sorted SELECT.
    ///
    /// An empty `projection` selects every column.
    pub fn prepare_query(
        &self,
        projection: &[PetColumn],
        selection: &Selection,
        sort: &SortOrder,
    ) -> RepoResult<PreparedQuery<'conn>> {
        let projection = if projection.is_empty() {
            PetColumn::ALL.to_vec()
        } else {
            projection.to_vec()
        };
        let column_list = projection
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {column_list} FROM {TABLE_NAME}{}{};",
            selection.where_sql(),
            sort.order_by_sql()
        );

        let stmt = self.conn.prepare(&sql)?;
        Ok(PreparedQuery {
            stmt,
            args: selection.args.clone(),
            projection,
        })
    }

    /// Inserts one row and returns its assigned id.
    ///
    /// # Errors
    /// - `InvalidData` when `values` is empty.
    /// - `Db` when storage rejects the row.
    pub fn insert(&self, values: &PetValues) -> RepoResult<PetId> {
        let columns = values.columns();
        if columns.is_empty() {
            return Err(RepoError::InvalidData(
                "cannot insert a pet without values".to_string(),
            ));
        }

        let names = columns
            .iter()
            .map(|(column, _)| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        self.conn.execute(
            &format!("INSERT INTO {TABLE_NAME} ({names}) VALUES ({placeholders});"),
            params_from_iter(columns.into_iter().map(|(_, value)| value)),
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Updates rows matching `selection` and returns the affected count.
    pub fn update(&self, values: &PetValues, selection: &Selection) -> RepoResult<usize> {
        let columns = values.columns();
        if columns.is_empty() {
            return Ok(0);
        }

        let assignments = columns
            .iter()
            .map(|(column, _)| format!("{} = ?", column.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let bind_values = columns
            .into_iter()
            .map(|(_, value)| value)
            .chain(selection.args.iter().cloned());

        let changed = self.conn.execute(
            &format!(
                "UPDATE {TABLE_NAME} SET {assignments}{};",
                selection.where_sql()
            ),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    /// Deletes rows matching `selection` and returns the affected count.
    pub fn delete(&self, selection: &Selection) -> RepoResult<usize> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {TABLE_NAME}{};", selection.where_sql()),
            params_from_iter(selection.args.iter()),
        )?;
        Ok(changed)
    }
}

fn parse_pet_row(row: &Row<'_>, projection: &[PetColumn]) -> rusqlite::Result<PetRow> {
    let mut parsed = PetRow::default();
    for (index, column) in projection.iter().enumerate() {
        match column {
            PetColumn::Id => parsed.id = Some(row.get(index)?),
            PetColumn::Name => parsed.name = Some(row.get(index)?),
            PetColumn::Breed => parsed.breed = Some(row.get(index)?),
            PetColumn::Gender => parsed.gender = Some(row.get(index)?),
            PetColumn::Weight => parsed.weight = Some(row.get(index)?),
        }
    }
    Ok(parsed)
}
