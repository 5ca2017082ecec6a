//! Tests for statement ingestion

#[cfg(test)]
mod tests {
    use super::super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "DATE,TIME,TYPE,DESCRIPTION,Misc Fees,Commissions & Fees,AMOUNT,BALANCE";

    fn statement_bytes(data_rows: &[&str]) -> Vec<u8> {
        let mut text = String::new();
        text.push_str("Account Statement for 865-xxxxx1 since 1/1/25 through 2/1/25\n");
        text.push_str("Cash Balance\n");
        text.push_str(HEADER);
        text.push('\n');
        for row in data_rows {
            text.push_str(row);
            text.push('\n');
        }
        text.into_bytes()
    }

    #[test]
    fn test_reads_trade_rows_in_file_order() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,BOT +2 SPXW 100 (Weeklys) 17 JAN 25 5900 CALL @1.05 CBOE,-0.10,-1.30,-210.00,4790.00",
            "1/17/25,10:02:11,TRD,SOLD -2 SPXW 100 (Weeklys) 17 JAN 25 5900 CALL @1.50 CBOE,-0.10,-1.30,299.80,5089.80",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows.len(), 2);
        assert!(statement.skipped.is_empty());
        assert_eq!(statement.rows[0].time, "09:31:02");
        assert_eq!(statement.rows[1].time, "10:02:11");
    }

    #[test]
    fn test_fee_columns_read_as_magnitudes() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,BOT +2 SPXW 100 17 JAN 25 5900 CALL @1.05,-0.10,-1.30,-210.00,4790.00",
        ]);
        let statement = read_statement(&bytes).unwrap();
        let row = &statement.rows[0];
        assert_eq!(row.misc_fees, dec!(0.10));
        assert_eq!(row.commissions_fees, dec!(1.30));
        assert_eq!(row.total_fees(), dec!(1.40));
        assert_eq!(row.amount, dec!(-210.00));
    }

    #[test]
    fn test_non_trade_rows_are_filtered_out() {
        let bytes = statement_bytes(&[
            "1/16/25,01:00:00,BAL,Cash balance at the start of business day,,,,5000.00",
            "1/17/25,09:31:02,TRD,BOT +2 SPXW 100 17 JAN 25 5900 CALL @1.05,-0.10,-1.30,-210.00,4790.00",
            "1/31/25,16:00:00,DOI,MARK TO MARKET,,,0.00,4790.00",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows.len(), 1);
        assert!(statement.rows[0].description.starts_with("BOT"));
    }

    #[test]
    fn test_blank_money_fields_read_as_zero() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,BOT +1 TSLA 100 21 MAR 25 250 CALL @2.00,,,-200.00,4800.00",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows[0].misc_fees, Decimal::ZERO);
        assert_eq!(statement.rows[0].commissions_fees, Decimal::ZERO);
    }

    #[test]
    fn test_thousands_separators_in_amount() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,\"BOT +10 SPXW 100 17 JAN 25 5900 CALL @1.50\",-0.50,-6.50,\"-1,500.00\",3500.00",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows[0].amount, dec!(-1500.00));
    }

    #[test]
    fn test_unparseable_number_is_reported_not_fatal() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,BOT +2 SPXW 100 17 JAN 25 5900 CALL @1.05,-0.10,-1.30,N/A,4790.00",
            "1/17/25,10:02:11,TRD,SOLD -2 SPXW 100 17 JAN 25 5900 CALL @1.50,-0.10,-1.30,299.80,5089.80",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.skipped.len(), 1);
        assert_eq!(statement.skipped[0].reason, SkipReason::BadNumber);
        assert_eq!(statement.skipped[0].time, "09:31:02");
        assert!(statement.skipped[0].detail.contains("N/A"));
    }

    #[test]
    fn test_rows_with_other_field_counts_are_dropped() {
        let bytes = statement_bytes(&[
            "1/17/25,09:31:02,TRD,BOT +2 SPXW 100 17 JAN 25 5900 CALL @1.05,-0.10,-1.30,-210.00,4790.00",
            "TOTAL,89.80",
        ]);
        let statement = read_statement(&bytes).unwrap();
        assert_eq!(statement.rows.len(), 1);
        assert!(statement.skipped.is_empty());
    }

    #[test]
    fn test_header_columns_may_be_padded_and_reordered() {
        let mut text = String::from("banner one\nbanner two\n");
        text.push_str("TYPE , DATE ,TIME,DESCRIPTION,AMOUNT,Misc Fees,Commissions & Fees,BALANCE\n");
        text.push_str("TRD,1/17/25,09:31:02,BOT +2 SPXW 100 17 JAN 25 5900 CALL @1.05,-210.00,-0.10,-1.30,4790.00\n");
        let statement = read_statement(text.as_bytes()).unwrap();
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.rows[0].date, "1/17/25");
        assert_eq!(statement.rows[0].amount, dec!(-210.00));
    }

    #[test]
    fn test_missing_columns_are_named_in_the_error() {
        let mut text = String::from("banner one\nbanner two\n");
        text.push_str("DATE,TIME,TYPE,Misc Fees,Commissions & Fees,AMOUNT\n");
        let err = read_statement(text.as_bytes()).unwrap_err();
        match err {
            UploadError::SchemaMismatch(missing) => {
                assert!(missing.contains("DESCRIPTION"));
                assert!(missing.contains("BALANCE"));
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_statement_too_short_for_a_header() {
        assert!(matches!(
            read_statement(b""),
            Err(UploadError::ParseFailure(_))
        ));
        assert!(matches!(
            read_statement(b"banner one\nbanner two\n"),
            Err(UploadError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("trades.csv").is_ok());
        assert!(validate_filename("2025-01 Statement.CSV").is_ok());
        assert_eq!(
            validate_filename("trades.txt"),
            Err(UploadError::InvalidExtension("trades.txt".to_string()))
        );
        assert!(validate_filename("").is_err());
        assert!(validate_filename("csv").is_err());
    }
}
