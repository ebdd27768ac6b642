// LogQuery - core/export.rs
//
// Inspection of the CSV payload returned by the download endpoint.
// CSV generation itself is the backend's job; the client only counts what
// it received so the user can see how many rows were saved.

use crate::util::error::ExportError;

/// Number of data rows (header excluded) in a CSV payload.
///
/// Rows may have differing field counts; only malformed quoting or invalid
/// UTF-8 is an error.
pub fn count_csv_rows(payload: &[u8]) -> Result<usize, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload);

    let mut count = 0;
    for record in reader.records() {
        record.map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_rows_excluding_header() {
        let payload = b"_id,projectId,deviceId,info,type,date\n\
                        a,p1,d1,Pump fault,error,2024-01-02\n\
                        b,p1,d2,\"Valve, stuck\",error,2024-01-03\n";
        assert_eq!(count_csv_rows(payload).unwrap(), 2);
    }

    #[test]
    fn test_header_only_is_zero_rows() {
        assert_eq!(count_csv_rows(b"_id,info\n").unwrap(), 0);
        assert_eq!(count_csv_rows(b"").unwrap(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let payload = b"_id,info\na,\xff\xfe\n";
        assert!(matches!(
            count_csv_rows(payload),
            Err(ExportError::Csv { .. })
        ));
    }
}
