use crate::driver::DriverCursor;
use crate::error::WarehouseError;
use crate::results::Row;

/// Forward-only, single-pass view over one statement's results.
///
/// Wraps a driver cursor and produces [`Row`]s. Reaching end-of-data via
/// [`fetch_one`](Rows::fetch_one) closes the driver cursor; later calls keep
/// returning `Ok(None)`.
#[derive(Debug)]
pub struct Rows<C: DriverCursor> {
    cursor: Option<C>,
    rows_affected: usize,
}

impl<C: DriverCursor> Rows<C> {
    #[must_use]
    pub fn new(cursor: C) -> Self {
        let rows_affected = cursor.rows_affected();
        Self {
            cursor: Some(cursor),
            rows_affected,
        }
    }

    /// Pull exactly one row. At end-of-data the driver cursor is closed and
    /// this (and every later call) returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch or the close fails.
    pub fn fetch_one(&mut self) -> Result<Option<Row>, WarehouseError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        match cursor.fetch_one()? {
            Some(values) => Ok(Some(Row::new(cursor.columns(), values))),
            None => {
                if let Some(mut cursor) = self.cursor.take() {
                    cursor.close()?;
                }
                Ok(None)
            }
        }
    }

    /// Pull up to `n` rows.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch fails.
    pub fn fetch_many(&mut self, n: usize) -> Result<Vec<Row>, WarehouseError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(Vec::new());
        };
        let columns = cursor.columns();
        let fetched = cursor.fetch_many(n)?;
        Ok(fetched
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect())
    }

    /// Pull all remaining rows.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch fails.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>, WarehouseError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(Vec::new());
        };
        let columns = cursor.columns();
        let fetched = cursor.fetch_all()?;
        Ok(fetched
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect())
    }

    /// Rows affected by the statement (DML).
    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }
}

impl<C: DriverCursor> Iterator for Rows<C> {
    type Item = Result<Row, WarehouseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch_one().transpose()
    }
}

impl<C: DriverCursor> Drop for Rows<C> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            let _ = cursor.close();
        }
    }
}
