//! Descriptive statistics for uploaded data columns.
//!
//! Numeric columns get the usual count / mean / spread / five-number summary
//! and several numeric columns together get a Pearson correlation matrix.
//! Categorical columns get their levels and most frequent value, a frequency
//! table, and cross-tabulations against one or two other columns.

use anyhow::{Result, anyhow};
use ndarray::{Array2, Zip};
use num_traits::Float;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Number of non-missing values
    pub count: usize,
    pub mean: f64,
    /// Sample variance (n - 1); None with fewer than two values
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
    /// Coefficient of variation, std_dev / mean; None when undefined
    pub cv: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Most frequent value, the smallest one on ties
    pub mode: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    /// Number of distinct values
    pub levels: usize,
    /// Most frequent value, the first one seen on ties
    pub top: String,
    /// Occurrences of `top`
    pub freq: usize,
}

fn to_f64_values<T: Float>(values: &[T]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| v.to_f64())
        .filter(|v| !v.is_nan())
        .collect()
}

/// Linear-interpolated quantile of sorted data.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(anyhow!("Cannot take a quantile of an empty column"));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(anyhow!("Quantile must lie in [0, 1], got {}", q));
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

fn mode_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_run = 0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_run {
            best_run = j - i;
            best = sorted[i];
        }
        i = j;
    }
    best
}

/// Summarize one numeric column. NaN values are treated as missing.
pub fn summarize<T>(values: &[T]) -> Result<ColumnSummary>
where
    T: Float,
{
    let mut sorted = to_f64_values(values);
    if sorted.is_empty() {
        return Err(anyhow!("Column has no non-missing values"));
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let count = sorted.len();
    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;

    let variance = if count < 2 {
        None
    } else {
        Some(sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0))
    };
    let std_dev = variance.map(f64::sqrt);
    let cv = std_dev
        .map(|sd| sd / mean)
        .filter(|cv| cv.is_finite());

    if variance == Some(0.0) {
        warn!(count, "column has zero variance");
    }

    Ok(ColumnSummary {
        count,
        mean,
        variance,
        std_dev,
        cv,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        max: sorted[count - 1],
        mode: mode_sorted(&sorted),
    })
}

/// Summarize several numeric columns in parallel.
pub fn summarize_columns<T>(columns: &[Vec<T>]) -> Result<Vec<ColumnSummary>>
where
    T: Float + Send + Sync,
{
    columns
        .par_iter()
        .enumerate()
        .map(|(i, column)| summarize(column.as_slice()).map_err(|e| anyhow!("Column {}: {}", i, e)))
        .collect()
}

pub fn summarize_categorical<S>(values: &[S]) -> Result<CategoricalSummary>
where
    S: AsRef<str>,
{
    if values.is_empty() {
        return Err(anyhow!("Column has no values"));
    }

    // value -> (occurrences, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        counts
            .entry(value.as_ref())
            .or_insert((0, position))
            .0 += 1;
    }

    let (top, (freq, _)) = counts
        .iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(value, stats)| (value.to_string(), *stats))
        .ok_or_else(|| anyhow!("Column has no values"))?;

    Ok(CategoricalSummary {
        count: values.len(),
        levels: counts.len(),
        top,
        freq,
    })
}

/// Row order of a [`FrequencyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrequencyOrder {
    /// Most frequent first; ties keep first-seen order
    Count,
    /// Lexicographic by level
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    pub levels: Vec<String>,
    pub counts: Vec<usize>,
}

impl FrequencyTable {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of the total per level.
    pub fn proportions(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }
}

/// Count the occurrences of every level of a categorical column.
pub fn frequency_table<S>(values: &[S], order: FrequencyOrder) -> Result<FrequencyTable>
where
    S: AsRef<str>,
{
    if values.is_empty() {
        return Err(anyhow!("Column has no values"));
    }

    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value.as_ref()).or_insert(0);
        if *count == 0 {
            first_seen.push(value.as_ref());
        }
        *count += 1;
    }

    let mut rows: Vec<(&str, usize)> = first_seen.iter().map(|&v| (v, counts[v])).collect();
    match order {
        // Stable sort keeps first-seen order among equal counts
        FrequencyOrder::Count => rows.sort_by(|a, b| b.1.cmp(&a.1)),
        FrequencyOrder::Name => rows.sort_by(|a, b| a.0.cmp(b.0)),
    }

    Ok(FrequencyTable {
        levels: rows.iter().map(|(v, _)| v.to_string()).collect(),
        counts: rows.iter().map(|(_, c)| *c).collect(),
    })
}

/// Cross-tabulated counts of two categorical columns. Levels are sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    pub row_levels: Vec<String>,
    pub column_levels: Vec<String>,
    /// `counts[[i, j]]` is the number of observations with row level `i` and
    /// column level `j`
    pub counts: Array2<usize>,
}

impl ContingencyTable {
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.rows().into_iter().map(|r| r.sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        self.counts.columns().into_iter().map(|c| c.sum()).collect()
    }

    /// Count for a pair of levels; zero when either level is absent.
    pub fn count(&self, row: &str, column: &str) -> usize {
        let i = self.row_levels.iter().position(|l| l == row);
        let j = self.column_levels.iter().position(|l| l == column);
        match (i, j) {
            (Some(i), Some(j)) => self.counts[[i, j]],
            _ => 0,
        }
    }
}

fn check_paired_columns(first: usize, second: usize) -> Result<()> {
    if first == 0 {
        return Err(anyhow!("Columns have no values"));
    }
    if first != second {
        return Err(anyhow!(
            "Columns must have equal length, got {} and {}",
            first,
            second
        ));
    }
    Ok(())
}

fn crosstab(pairs: &[(&str, &str)]) -> ContingencyTable {
    let row_levels: Vec<&str> =
        pairs.iter().map(|p| p.0).collect::<BTreeSet<_>>().into_iter().collect();
    let column_levels: Vec<&str> =
        pairs.iter().map(|p| p.1).collect::<BTreeSet<_>>().into_iter().collect();
    let row_index: HashMap<&str, usize> =
        row_levels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
    let column_index: HashMap<&str, usize> =
        column_levels.iter().enumerate().map(|(j, l)| (*l, j)).collect();

    let mut counts = Array2::<usize>::zeros((row_levels.len(), column_levels.len()));
    for (row, column) in pairs {
        counts[[row_index[row], column_index[column]]] += 1;
    }

    ContingencyTable {
        row_levels: row_levels.iter().map(|l| l.to_string()).collect(),
        column_levels: column_levels.iter().map(|l| l.to_string()).collect(),
        counts,
    }
}

/// Two-way contingency table of equally long categorical columns.
pub fn contingency_table<S, U>(rows: &[S], columns: &[U]) -> Result<ContingencyTable>
where
    S: AsRef<str>,
    U: AsRef<str>,
{
    check_paired_columns(rows.len(), columns.len())?;
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .zip(columns)
        .map(|(r, c)| (r.as_ref(), c.as_ref()))
        .collect();
    Ok(crosstab(&pairs))
}

/// One contingency table per level of `groups`, in first-seen group order.
///
/// Each table only lists the row and column levels present in its group.
pub fn grouped_contingency_tables<S, U, G>(
    rows: &[S],
    columns: &[U],
    groups: &[G],
) -> Result<Vec<(String, ContingencyTable)>>
where
    S: AsRef<str> + Sync,
    U: AsRef<str> + Sync,
    G: AsRef<str>,
{
    check_paired_columns(rows.len(), columns.len())?;
    check_paired_columns(rows.len(), groups.len())?;

    let mut order: Vec<&str> = Vec::new();
    let mut members: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, group) in groups.iter().enumerate() {
        let indices = members.entry(group.as_ref()).or_default();
        if indices.is_empty() {
            order.push(group.as_ref());
        }
        indices.push(i);
    }

    Ok(order
        .par_iter()
        .map(|group| {
            let pairs: Vec<(&str, &str)> = members[group]
                .iter()
                .map(|&i| (rows[i].as_ref(), columns[i].as_ref()))
                .collect();
            (group.to_string(), crosstab(&pairs))
        })
        .collect())
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Pearson correlation matrix of equally long numeric columns.
///
/// Pairs involving a constant column are NaN.
pub fn correlation_matrix<T>(columns: &[Vec<T>]) -> Result<Array2<f64>>
where
    T: Float + Send + Sync,
{
    if columns.is_empty() {
        return Err(anyhow!("Need at least one column"));
    }
    let len = columns[0].len();
    if len < 2 {
        return Err(anyhow!("Columns need at least 2 rows, got {}", len));
    }
    if let Some((i, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != len) {
        return Err(anyhow!(
            "Column {} has {} rows, expected {}",
            i,
            column.len(),
            len
        ));
    }

    let data: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| c.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect())
        .collect();

    let k = data.len();
    let mut matrix = Array2::<f64>::zeros((k, k));
    Zip::indexed(&mut matrix).par_for_each(|(i, j), value| {
        *value = pearson(&data[i], &data[j]);
    });

    if matrix.iter().any(|v| v.is_nan()) {
        warn!("correlation matrix contains undefined entries");
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_summarize_basic() {
        let values = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = summarize(&values).unwrap();

        assert_eq!(summary.count, 8);
        assert_abs_diff_eq!(summary.mean, 5.0);
        assert_abs_diff_eq!(summary.variance.unwrap(), 32.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.cv.unwrap(), (32.0_f64 / 7.0).sqrt() / 5.0, epsilon = 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_abs_diff_eq!(summary.q1, 4.0);
        assert_abs_diff_eq!(summary.median, 4.5);
        assert_abs_diff_eq!(summary.q3, 5.5);
        assert_eq!(summary.mode, 4.0);
    }

    #[test]
    fn test_missing_values_skipped() {
        let values = vec![1.0_f32, f32::NAN, 3.0];
        let summary = summarize(&values).unwrap();
        assert_eq!(summary.count, 2);
        assert_abs_diff_eq!(summary.mean, 2.0);
    }

    #[test]
    fn test_single_value_and_zero_mean() {
        let one = summarize(&[3.0_f64]).unwrap();
        assert!(one.variance.is_none());
        assert!(one.cv.is_none());
        assert_eq!(one.median, 3.0);

        let centered = summarize(&[-1.0_f64, 1.0]).unwrap();
        assert!(centered.cv.is_none());
        // Tie between -1 and 1 resolves to the smaller value
        assert_eq!(centered.mode, -1.0);

        assert!(summarize::<f64>(&[]).is_err());
        assert!(summarize(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_summarize_columns_parallel() {
        let columns = vec![vec![1.0_f64, 2.0, 3.0], vec![10.0, 20.0, 30.0]];
        let summaries = summarize_columns(&columns).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_abs_diff_eq!(summaries[1].mean, 20.0);

        let with_empty: Vec<Vec<f64>> = vec![vec![1.0], vec![]];
        assert!(summarize_columns(&with_empty).is_err());
    }

    #[test]
    fn test_categorical() {
        let values = ["b", "a", "b", "c", "a"];
        let summary = summarize_categorical(&values).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.levels, 3);
        // "a" and "b" tie; "b" appears first
        assert_eq!(summary.top, "b");
        assert_eq!(summary.freq, 2);

        let empty: [&str; 0] = [];
        assert!(summarize_categorical(&empty).is_err());
    }

    #[test]
    fn test_frequency_table_orders() {
        let values = ["b", "a", "c", "b", "c", "b", "d"];

        let by_count = frequency_table(&values, FrequencyOrder::Count).unwrap();
        // "c" and "a"/"d" keep first-seen order within equal counts
        assert_eq!(by_count.levels, vec!["b", "c", "a", "d"]);
        assert_eq!(by_count.counts, vec![3, 2, 1, 1]);
        assert_eq!(by_count.total(), 7);

        let by_name = frequency_table(&values, FrequencyOrder::Name).unwrap();
        assert_eq!(by_name.levels, vec!["a", "b", "c", "d"]);
        assert_eq!(by_name.counts, vec![1, 3, 2, 1]);
        assert_abs_diff_eq!(by_name.proportions()[1], 3.0 / 7.0, epsilon = 1e-12);

        let empty: [&str; 0] = [];
        assert!(frequency_table(&empty, FrequencyOrder::Count).is_err());
    }

    #[test]
    fn test_contingency_table() {
        let sex = ["M", "F", "F", "M", "F", "M"];
        let smoker = ["yes", "no", "no", "no", "yes", "no"];
        let table = contingency_table(&sex, &smoker).unwrap();

        assert_eq!(table.row_levels, vec!["F", "M"]);
        assert_eq!(table.column_levels, vec!["no", "yes"]);
        assert_eq!(table.counts, ndarray::array![[2, 1], [2, 1]]);
        assert_eq!(table.count("M", "no"), 2);
        assert_eq!(table.count("X", "no"), 0);
        assert_eq!(table.row_totals(), vec![3, 3]);
        assert_eq!(table.column_totals(), vec![4, 2]);
        assert_eq!(table.total(), 6);

        assert!(contingency_table(&sex, &smoker[..5]).is_err());
        let empty: [&str; 0] = [];
        assert!(contingency_table(&empty, &empty).is_err());
    }

    #[test]
    fn test_grouped_contingency_tables() {
        let sex = ["M", "F", "F", "M", "F", "M"];
        let smoker = ["yes", "no", "no", "no", "yes", "no"];
        let day = ["Sun", "Sat", "Sun", "Sun", "Sat", "Sat"];
        let tables = grouped_contingency_tables(&sex, &smoker, &day).unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, "Sun");
        assert_eq!(tables[1].0, "Sat");

        let sunday = &tables[0].1;
        assert_eq!(sunday.total(), 3);
        assert_eq!(sunday.count("M", "yes"), 1);
        assert_eq!(sunday.count("M", "no"), 1);
        assert_eq!(sunday.count("F", "no"), 1);

        let grand: usize = tables.iter().map(|(_, t)| t.total()).sum();
        assert_eq!(grand, sex.len());

        assert!(grouped_contingency_tables(&sex, &smoker, &day[..4]).is_err());
    }

    #[test]
    fn test_correlation_matrix() {
        let columns = vec![
            vec![1.0_f64, 2.0, 3.0, 4.0],
            vec![2.0, 4.0, 6.0, 8.0],
            vec![4.0, 3.0, 2.0, 1.0],
            vec![5.0, 5.0, 5.0, 5.0],
        ];
        let matrix = correlation_matrix(&columns).unwrap();

        assert_eq!(matrix.dim(), (4, 4));
        assert_abs_diff_eq!(matrix[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(matrix[[0, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(matrix[[0, 2]], -1.0, epsilon = 1e-12);
        assert_eq!(matrix[[1, 2]], matrix[[2, 1]]);
        assert!(matrix[[0, 3]].is_nan());
    }

    #[test]
    fn test_correlation_shape_errors() {
        let ragged = vec![vec![1.0_f64, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(correlation_matrix(&ragged).is_err());
        let short = vec![vec![1.0_f64]];
        assert!(correlation_matrix(&short).is_err());
        let none: Vec<Vec<f64>> = vec![];
        assert!(correlation_matrix(&none).is_err());
    }
}
