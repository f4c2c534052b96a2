//! Group-by, pivot and reindex helpers shared by the chart builders.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// 依出現次數遞減排序，次數相同時依標籤排序
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    sort_counts(counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

pub fn sort_counts(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

pub fn group_sum<K, I>(pairs: I) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut sums = BTreeMap::new();
    for (key, value) in pairs {
        *sums.entry(key).or_insert(0.0) += value;
    }
    sums
}

/// 相對前一期的百分比變化；第一期或前期為 0 時沒有值
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let change = match idx.checked_sub(1).map(|prev| values[prev]) {
            Some(prev) if prev != 0.0 => Some((value - prev) / prev * 100.0),
            _ => None,
        };
        changes.push(change);
    }
    changes
}

/// 保留第一次出現順序的去重
pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// 每個群組中不重複值的個數
pub fn count_distinct<K, V, I>(pairs: I) -> HashMap<K, usize>
where
    K: Eq + Hash,
    V: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    let mut sets: HashMap<K, HashSet<V>> = HashMap::new();
    for (key, value) in pairs {
        sets.entry(key).or_default().insert(value);
    }
    sets.into_iter().map(|(k, set)| (k, set.len())).collect()
}

/// 二維樞紐表，缺少的格子為 0
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    cells: HashMap<(String, String), f64>,
}

impl PivotTable {
    /// 由 (列, 欄, 值) 累加建立，列與欄標籤依字典序排列
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (String, String, f64)>,
    {
        let mut rows = std::collections::BTreeSet::new();
        let mut cols = std::collections::BTreeSet::new();
        let mut values: HashMap<(String, String), f64> = HashMap::new();

        for (row, col, value) in cells {
            rows.insert(row.clone());
            cols.insert(col.clone());
            *values.entry((row, col)).or_insert(0.0) += value;
        }

        Self {
            row_labels: rows.into_iter().collect(),
            col_labels: cols.into_iter().collect(),
            cells: values,
        }
    }

    pub fn get(&self, row: &str, col: &str) -> f64 {
        self.cells
            .get(&(row.to_string(), col.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn reindex_rows<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        self.row_labels = labels.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    pub fn reindex_cols<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        self.col_labels = labels.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    pub fn row_total(&self, row: &str) -> f64 {
        self.col_labels.iter().map(|col| self.get(row, col)).sum()
    }

    /// 依目前的列欄順序輸出矩陣
    pub fn to_grid(&self) -> Vec<Vec<f64>> {
        self.row_labels
            .iter()
            .map(|row| self.col_labels.iter().map(|col| self.get(row, col)).collect())
            .collect()
    }
}

/// 等寬直方圖，最多 `max_bins` 組，組寬至少 1 歲
pub fn histogram(values: &[u32], max_bins: usize) -> Vec<(String, usize)> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };

    // 以 u64 計算組距，避免極端值溢位
    let (min, max) = (u64::from(min), u64::from(max));
    let bins = max_bins.max(1) as u64;
    let span = max - min + 1;
    let width = span.div_ceil(bins).max(1);
    let bin_count = span.div_ceil(width) as usize;

    let mut counts = vec![0usize; bin_count];
    for value in values {
        counts[((u64::from(*value) - min) / width) as usize] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| {
            let lo = min + idx as u64 * width;
            let hi = (lo + width - 1).min(max);
            let label = if width == 1 {
                lo.to_string()
            } else {
                format!("{}-{}", lo, hi)
            };
            (label, count)
        })
        .collect()
}

/// 回傳計數最高的前 `n` 個鍵
pub fn top_n(counts: &[(String, usize)], n: usize) -> Vec<String> {
    counts.iter().take(n).map(|(label, _)| label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_orders_by_count_then_label() {
        let counts = value_counts(["F", "M", "F", "Unknown", "M", "F"]);
        assert_eq!(
            counts,
            vec![
                ("F".to_string(), 3),
                ("M".to_string(), 2),
                ("Unknown".to_string(), 1)
            ]
        );

        let ties = value_counts(["b", "a"]);
        assert_eq!(ties[0].0, "a");
    }

    #[test]
    fn test_pct_change() {
        let changes = pct_change(&[100.0, 150.0, 0.0, 50.0]);
        assert_eq!(changes[0], None);
        assert_eq!(changes[1], Some(50.0));
        assert_eq!(changes[2], Some(-100.0));
        assert_eq!(changes[3], None);
    }

    #[test]
    fn test_pivot_reindex_fills_zero() {
        let pivot = PivotTable::from_cells(vec![
            ("Monday".to_string(), "2024-01".to_string(), 10.0),
            ("Monday".to_string(), "2024-01".to_string(), 5.0),
            ("Friday".to_string(), "2024-02".to_string(), 7.0),
        ])
        .reindex_rows(&["Monday", "Tuesday", "Friday"]);

        assert_eq!(pivot.col_labels, vec!["2024-01", "2024-02"]);
        assert_eq!(
            pivot.to_grid(),
            vec![vec![15.0, 0.0], vec![0.0, 0.0], vec![0.0, 7.0]]
        );
        assert_eq!(pivot.row_total("Monday"), 15.0);
    }

    #[test]
    fn test_histogram_bins() {
        let ages: Vec<u32> = (18..=57).collect();
        let bins = histogram(&ages, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins[0], ("18-19".to_string(), 2));
        assert_eq!(bins.iter().map(|(_, c)| c).sum::<usize>(), ages.len());

        let narrow = histogram(&[30, 30, 31], 20);
        assert_eq!(narrow, vec![("30".to_string(), 2), ("31".to_string(), 1)]);

        assert!(histogram(&[], 20).is_empty());
    }

    #[test]
    fn test_histogram_full_u32_span() {
        let bins = histogram(&[0, 30, u32::MAX], 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins[0].1, 2);
        assert_eq!(bins[19].1, 1);
        assert!(bins[19].0.ends_with(&u32::MAX.to_string()));
        assert_eq!(bins.iter().map(|(_, c)| c).sum::<usize>(), 3);

        assert_eq!(histogram(&[u32::MAX], 20), vec![(u32::MAX.to_string(), 1)]);
    }

    #[test]
    fn test_unique_and_distinct() {
        assert_eq!(unique_in_order(["台北市", "新北市", "台北市"]), vec!["台北市", "新北市"]);

        let distinct = count_distinct(vec![("T1", "S1"), ("T1", "S1"), ("T1", "S2"), ("T2", "S1")]);
        assert_eq!(distinct["T1"], 2);
        assert_eq!(distinct["T2"], 1);
    }
}
