//! # Workload runner
//!
//! Statement text is built before the clock starts, the measured span covers
//! driver calls only.

use std::time::Instant;

use batchperf_error::Result;
use rand::Rng;

use crate::{Connection, Mode, Outcome, Timing, Workload};

/// # Run each mode in order with a fresh workload
///
/// A failing mode does not stop the following ones.
pub async fn compare<R: Rng + ?Sized>(
    conn: &Connection,
    modes: &[Mode],
    rng: &mut R,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(modes.len());

    for &mode in modes {
        let workload = Workload::generate(&mut *rng);
        let result = run(conn, mode, &workload).await;
        if let Err(e) = &result {
            log::debug!("Run {} failed: {}", mode, e);
        }

        outcomes.push(Outcome { mode, result });
    }

    outcomes
}

pub async fn run(conn: &Connection, mode: Mode, workload: &Workload) -> Result<Timing> {
    match mode {
        Mode::Batched => run_batched(conn, workload).await,
        Mode::Unbatched => run_unbatched(conn, workload).await,
    }
}

/// Submit create, inserts and drop as a single batch
pub async fn run_batched(conn: &Connection, workload: &Workload) -> Result<Timing> {
    let statements = workload.statements();
    log::debug!("Run batched, {} statements", statements.len());

    let start = Instant::now();
    conn.execute_batch(statements)
        .await
        .map_err(|e| batchperf_error::batched!("{}", e))?;
    let elapsed = start.elapsed();

    Ok(Timing::new(Mode::Batched, elapsed))
}

/// Submit and await every statement in turn, stop at the first failure
pub async fn run_unbatched(conn: &Connection, workload: &Workload) -> Result<Timing> {
    let statements = workload.statements();
    log::debug!("Run unbatched, {} statements", statements.len());

    let start = Instant::now();
    for (i, sql) in statements.iter().enumerate() {
        conn.execute(sql).await.map_err(|e| {
            batchperf_error::unbatched!("Statement {} of {}: {}", i + 1, statements.len(), e)
        })?;
    }
    let elapsed = start.elapsed();

    Ok(Timing::new(Mode::Unbatched, elapsed))
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_unopened_connection() {
        let conn = Connection::unopened();
        let workload = Workload::from_rows(vec![[0.1, 0.2, 0.3]]);

        let err = run(&conn, Mode::Batched, &workload).await.unwrap_err();
        assert!(matches!(err, batchperf_error::Error::Batched(_)));

        let err = run(&conn, Mode::Unbatched, &workload).await.unwrap_err();
        assert!(matches!(err, batchperf_error::Error::Unbatched(_)));
    }
}
