// ═══════════════════════════════════════════════════════════════════
// Loader Tests: holdings, listing, overrides and fund weights from CSV
// ═══════════════════════════════════════════════════════════════════

use std::path::{Path, PathBuf};

use portfolio_benchmark_core::errors::CoreError;
use portfolio_benchmark_core::loaders::fund_weights::load_fund_weights;
use portfolio_benchmark_core::loaders::holdings::load_holdings;
use portfolio_benchmark_core::loaders::listing::load_listing;
use portfolio_benchmark_core::loaders::overrides::load_overrides;
use portfolio_benchmark_core::loaders::read_table;
use portfolio_benchmark_core::models::settings::{HoldingColumns, ListingColumns};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════════════

mod tables {
    use super::*;

    #[test]
    fn csv_cells_are_trimmed_and_rows_may_be_ragged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "a , b\n1,2,3\nx\n");
        let table = read_table(&path, None).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], vec!["a", "b"]);
        assert_eq!(table[1].len(), 3);
        assert_eq!(table[2], vec!["x"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "t.json", "{}");
        assert!(matches!(
            read_table(&path, None),
            Err(CoreError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("absent.csv"), None);
        assert!(matches!(result, Err(CoreError::Csv(_)) | Err(CoreError::FileIO(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Holdings
// ═══════════════════════════════════════════════════════════════════

mod holdings {
    use super::*;

    const EXPORT: &str = "\
NAME,Security Name,Holding,Demat Holding Vlaue (Rs.)
Alice,INFOSYS LIMITED EQ FV RS 5,10,\"15,000.50\"
Alice,TATA MOTORS LIMITED,5,4500
Bob ,HDFC BANK LIMITED,2,3200
Bob,,1,100
Carol,WIPRO LIMITED,n/a,100
";

    #[test]
    fn default_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "holdings.csv", EXPORT);

        let holdings = load_holdings(&path, &HoldingColumns::default()).unwrap();
        assert_eq!(holdings.len(), 3);
        assert_eq!(holdings[0].investor, "Alice");
        assert_eq!(holdings[0].security_name, "INFOSYS LIMITED EQ FV RS 5");
        assert_eq!(holdings[0].quantity, 10.0);
        assert_eq!(holdings[0].current_value, 15000.5);
        assert_eq!(holdings[2].investor, "Bob");
    }

    #[test]
    fn header_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "holdings.csv",
            "investor,security,qty,value\nAlice,Infosys,1,1500\n",
        );
        let columns = HoldingColumns {
            investor: "Investor".into(),
            security: "SECURITY".into(),
            quantity: "Qty".into(),
            current_value: "Value".into(),
            sheet: None,
        };
        let holdings = load_holdings(&path, &columns).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].current_value, 1500.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "holdings.csv", "NAME,Security Name\nAlice,Infosys\n");
        match load_holdings(&path, &HoldingColumns::default()) {
            Err(CoreError::MissingColumn { column, .. }) => assert_eq!(column, "Holding"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_file_has_no_holdings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "holdings.csv", "");
        assert!(load_holdings(&path, &HoldingColumns::default()).unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Listing
// ═══════════════════════════════════════════════════════════════════

mod listing {
    use super::*;

    #[test]
    fn nse_equity_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "EQUITY_L.csv",
            "SYMBOL,NAME OF COMPANY, SERIES\n\
             20MICRONS,20 Microns Limited,EQ\n\
             infy,Infosys Limited,EQ\n\
             ,Nameless Limited,EQ\n",
        );
        let entries = load_listing(&path, &ListingColumns::default()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].symbol, "INFY");
        assert_eq!(entries[1].company_name, "Infosys Limited");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Overrides
// ═══════════════════════════════════════════════════════════════════

mod overrides {
    use super::*;

    #[test]
    fn with_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "overrides.csv",
            "security_name,symbol\nBOSCH LIMITED,BOSCHLTD\nEMPTY,\n",
        );
        let pairs = load_overrides(&path).unwrap();
        assert_eq!(pairs, vec![("BOSCH LIMITED".to_string(), "BOSCHLTD".to_string())]);
    }

    #[test]
    fn without_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "overrides.csv", "BOSCH LIMITED,BOSCHLTD\n");
        assert_eq!(load_overrides(&path).unwrap().len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fund Weights
// ═══════════════════════════════════════════════════════════════════

mod fund_weights {
    use super::*;

    const SHEET: &str = "\
GM Multi Cap (As on 31-Aug-2025),,
Stock Name,Sector,Weight (%)
Infosys Limited,IT,40%
HDFC Bank Limited,Banks,35
Tata Motors Limited,Auto,25
Total,,100
,,
GM Mid & Small Cap,,
Company,Weight,
Zomato Limited,60,
KPIT Technologies Limited,40,
";

    fn titles() -> Vec<String> {
        vec!["GM Multi Cap".to_string(), "GM Mid & Small Cap".to_string()]
    }

    #[test]
    fn reads_each_fund_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "weights.csv", SHEET);

        let funds = load_fund_weights(&path, None, &titles()).unwrap();
        assert_eq!(funds.len(), 2);

        assert_eq!(funds[0].name, "GM Multi Cap");
        assert_eq!(funds[0].weights.len(), 3);
        assert_eq!(funds[0].weights[0].security_name, "Infosys Limited");
        assert_eq!(funds[0].weights[0].weight, 40.0);
        assert_eq!(funds[0].total_weight(), 100.0);

        assert_eq!(funds[1].name, "GM Mid & Small Cap");
        assert_eq!(funds[1].weights.len(), 2);
        assert_eq!(
            funds[1].security_names().collect::<Vec<_>>(),
            vec!["Zomato Limited", "KPIT Technologies Limited"]
        );
    }

    #[test]
    fn constituent_named_total_does_not_end_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "weights.csv",
            "GM Multi Cap\n\
             Stock Name,Weight\n\
             Adani Total Gas Limited,30\n\
             TOTAL ENERGIES LIMITED,20\n\
             Infosys Limited,50\n\
             Total:,100\n\
             After Total,5\n",
        );
        let funds = load_fund_weights(&path, None, &["GM Multi Cap".to_string()]).unwrap();
        assert_eq!(
            funds[0].security_names().collect::<Vec<_>>(),
            vec!["Adani Total Gas Limited", "TOTAL ENERGIES LIMITED", "Infosys Limited"]
        );
    }

    #[test]
    fn missing_title_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "weights.csv", SHEET);
        let funds = load_fund_weights(&path, None, &["GM Flexi Cap".to_string()]).unwrap();
        assert!(funds.is_empty());
    }

    #[test]
    fn block_without_weight_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "weights.csv",
            "GM Multi Cap\nStock Name,Sector\nInfosys Limited,IT\n",
        );
        assert!(matches!(
            load_fund_weights(&path, None, &["GM Multi Cap".to_string()]),
            Err(CoreError::MissingColumn { .. })
        ));
    }
}
