//! Conversion from DataFrames to typed series.

use polars::prelude::*;
use ppe_primitives::{Date, FactorName, ReturnSeries, StyleFactorMatrix};

use crate::UtilsError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, UtilsError> {
    df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))
}

fn extract_dates(df: &DataFrame, name: &str) -> Result<Vec<Date>, UtilsError> {
    let column = get_column(df, name)?;

    match column.dtype() {
        DataType::Date => column
            .date()?
            .as_date_iter()
            .enumerate()
            .map(|(row, d)| d.ok_or_else(|| UtilsError::InvalidDate { row, value: "null".to_string() }))
            .collect(),
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, s)| {
                let s = s.ok_or_else(|| UtilsError::InvalidDate { row, value: "null".to_string() })?;
                Date::parse_from_str(s.trim(), DATE_FORMAT)
                    .map_err(|_| UtilsError::InvalidDate { row, value: s.to_string() })
            })
            .collect(),
        other => Err(UtilsError::UnsupportedType {
            column: name.to_string(),
            dtype: other.to_string(),
        }),
    }
}

fn extract_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, UtilsError> {
    let column = get_column(df, name)?;
    if !is_numeric(column.dtype()) {
        return Err(UtilsError::UnsupportedType {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Read a return series from two columns of a DataFrame.
///
/// # Arguments
/// * `df` - Input DataFrame
/// * `date_col` - Date column, polars `Date` or `%Y-%m-%d` strings
/// * `value_col` - Numeric return column; nulls become NaN
///
/// # Errors
/// Returns error if a column is missing or of the wrong type, a date does not
/// parse, or the dates are not strictly increasing.
pub fn returns_from_frame(
    df: &DataFrame,
    date_col: &str,
    value_col: &str,
) -> Result<ReturnSeries, UtilsError> {
    let dates = extract_dates(df, date_col)?;
    let values = extract_values(df, value_col)?;
    Ok(ReturnSeries::new(dates, values.into())?)
}

/// Read a style factor matrix from a date column and factor columns.
///
/// Factor order follows `factor_cols`.
///
/// # Errors
/// Returns error if a column is missing or of the wrong type, a date does not
/// parse, the dates are not strictly increasing, or `factor_cols` is empty.
pub fn styles_from_frame(
    df: &DataFrame,
    date_col: &str,
    factor_cols: &[&str],
) -> Result<StyleFactorMatrix, UtilsError> {
    let dates = extract_dates(df, date_col)?;
    let columns = factor_cols
        .iter()
        .map(|&name| Ok((FactorName::from(name), extract_values(df, name)?)))
        .collect::<Result<Vec<_>, UtilsError>>()?;
    Ok(StyleFactorMatrix::from_columns(dates, columns)?)
}

/// Names of the numeric columns of `df`, in frame order, minus `exclude`.
#[must_use]
pub fn numeric_columns(df: &DataFrame, exclude: &[&str]) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()) && !exclude.contains(&c.name().as_str()))
        .map(|c| c.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use ppe_primitives::PrimitivesError;

    use super::*;

    fn sample() -> DataFrame {
        df! {
            "date" => &["2024-01-01", "2024-01-02", "2024-01-03"],
            "fund" => &[Some(0.01), None, Some(0.015)],
            "value" => &[0.012, 0.008, 0.011],
            "growth" => &[-0.002, 0.004, 0.0],
            "label" => &["a", "b", "c"],
        }
        .unwrap()
    }

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn returns_from_string_dates() {
        let series = returns_from_frame(&sample(), "date", "fund").unwrap();

        assert_eq!(series.dates(), &[d(1), d(2), d(3)]);
        assert_eq!(series.values()[0], 0.01);
        assert!(series.values()[1].is_nan());
    }

    #[test]
    fn returns_from_date_column() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec![d(2), d(3)]),
            Column::new("fund".into(), vec![1_i64, 2]),
        ])
        .unwrap();

        let series = returns_from_frame(&df, "date", "fund").unwrap();
        assert_eq!(series.dates(), &[d(2), d(3)]);
        assert_eq!(series.values()[1], 2.0);
    }

    #[test]
    fn styles_keep_column_order() {
        let styles = styles_from_frame(&sample(), "date", &["growth", "value"]).unwrap();

        assert_eq!(styles.factor_names()[0].as_str(), "growth");
        assert_eq!(styles.values()[[0, 1]], 0.012);
        assert_eq!(styles.len(), 3);
    }

    #[test]
    fn numeric_columns_skip_excluded_and_text() {
        assert_eq!(numeric_columns(&sample(), &["fund"]), vec!["value", "growth"]);
    }

    #[test]
    fn missing_and_mistyped_columns() {
        assert!(matches!(
            returns_from_frame(&sample(), "date", "nope"),
            Err(UtilsError::MissingColumn(name)) if name == "nope"
        ));
        assert!(matches!(
            returns_from_frame(&sample(), "date", "label"),
            Err(UtilsError::UnsupportedType { .. })
        ));
        assert!(matches!(
            returns_from_frame(&sample(), "value", "fund"),
            Err(UtilsError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn bad_dates() {
        let df = df! {
            "date" => &["2024-01-01", "01/02/2024"],
            "fund" => &[0.01, 0.02],
        }
        .unwrap();
        assert!(matches!(
            returns_from_frame(&df, "date", "fund"),
            Err(UtilsError::InvalidDate { row: 1, .. })
        ));

        let df = df! {
            "date" => &["2024-01-02", "2024-01-01"],
            "fund" => &[0.01, 0.02],
        }
        .unwrap();
        assert!(matches!(
            returns_from_frame(&df, "date", "fund"),
            Err(UtilsError::Primitives(PrimitivesError::UnorderedDates { position: 1 }))
        ));
    }

    #[test]
    fn no_factor_columns() {
        assert!(matches!(
            styles_from_frame(&sample(), "date", &[]),
            Err(UtilsError::Primitives(PrimitivesError::NoFactors))
        ));
    }
}
