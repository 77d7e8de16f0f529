use rand::Rng;

pub const TABLE_NAME: &str = "temp";
pub const COLUMNS: [&str; 3] = ["num1", "num2", "num3"];
/// Inserted rows per run
pub const ROW_COUNT: usize = 1000;

/// Statements of one run: create `temp`, insert every row, drop `temp`.
///
/// Values are rendered into the statement text, no parameters are bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    rows: Vec<[f64; 3]>,
}

impl Workload {
    /// # Generate `ROW_COUNT` rows of uniform values in `[0, 1)`
    ///
    /// ```
    /// use batchperf::{Workload, ROW_COUNT};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let a = Workload::generate(&mut StdRng::seed_from_u64(7));
    /// let b = Workload::generate(&mut StdRng::seed_from_u64(7));
    ///
    /// assert_eq!(a, b);
    /// assert_eq!(a.statements().len(), ROW_COUNT + 2);
    /// ```
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rows = (0..ROW_COUNT)
            .map(|_| [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()])
            .collect();

        Self { rows }
    }

    pub fn from_rows(rows: Vec<[f64; 3]>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f64; 3]] {
        &self.rows
    }

    pub fn create_sql() -> String {
        format!(
            "create table {}({} double, {} double, {} double)",
            TABLE_NAME, COLUMNS[0], COLUMNS[1], COLUMNS[2]
        )
    }

    pub fn insert_sql(row: &[f64; 3]) -> String {
        format!(
            "insert into {} ({}) values ({},{},{})",
            TABLE_NAME,
            COLUMNS.join(", "),
            row[0],
            row[1],
            row[2]
        )
    }

    pub fn drop_sql() -> String {
        format!("drop table {}", TABLE_NAME)
    }

    /// Create, one insert per row, drop
    pub fn statements(&self) -> Vec<String> {
        let mut list = Vec::with_capacity(self.rows.len() + 2);

        list.push(Self::create_sql());
        list.extend(self.rows.iter().map(Self::insert_sql));
        list.push(Self::drop_sql());

        list
    }
}
