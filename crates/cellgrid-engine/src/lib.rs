//! cellgrid_engine - Spreadsheet formula engine.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use pretty_assertions::assert_eq;

    fn sheet(cells: &[(&str, &str)]) -> Sheet {
        let mut sheet = Sheet::default();
        for (addr, raw) in cells {
            sheet.set(CellRef::from_str(addr).unwrap(), *raw);
        }
        sheet
    }

    fn value_at(sheet: &Sheet, addr: &str) -> Value {
        sheet.evaluate(&CellRef::from_str(addr).unwrap())
    }

    #[test]
    fn test_from_str_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!((a1.col(), a1.row()), (0, 0));

        let b1 = CellRef::from_str("B1").unwrap();
        assert_eq!((b1.col(), b1.row()), (1, 0));

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!((z1.col(), z1.row()), (25, 0));
    }

    #[test]
    fn test_from_str_row_numbers() {
        assert_eq!(CellRef::from_str("A10").unwrap().row(), 9);
        assert_eq!(CellRef::from_str("A100").unwrap().row(), 99);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(CellRef::from_str("c7"), CellRef::from_str("C7"));
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("ABC").is_none());
        assert!(CellRef::from_str("AA1").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("A-1").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
        assert!(CellRef::from_str(" A1").is_none());
    }

    #[test]
    fn test_literal_passthrough() {
        let sheet = sheet(&[("A1", "5")]);
        assert_eq!(value_at(&sheet, "A1"), Value::Text("5".to_string()));
    }

    #[test]
    fn test_direct_self_cycle() {
        let sheet = sheet(&[("A1", "=A1")]);
        assert_eq!(value_at(&sheet, "A1").display(), "#CIRC!");
    }

    #[test]
    fn test_mutual_cycle_either_order() {
        let sheet = sheet(&[("A1", "=B1"), ("B1", "=A1")]);
        assert_eq!(value_at(&sheet, "A1"), Value::Error(Sentinel::Circular));
        assert_eq!(value_at(&sheet, "B1"), Value::Error(Sentinel::Circular));

        let display = sheet.recompute_all();
        assert_eq!(display.display(&CellRef::new(0, 0)), "#CIRC!");
        assert_eq!(display.display(&CellRef::new(1, 0)), "#CIRC!");
    }

    #[test]
    fn test_range_sum_with_mixed_content() {
        let sheet = sheet(&[("B1", "1"), ("B2", "2"), ("B3", "x"), ("A1", "=SUM(B1:B3)")]);
        assert_eq!(value_at(&sheet, "A1"), Value::Number(3.0));
    }

    #[test]
    fn test_arithmetic_substitution() {
        let sheet = sheet(&[("B1", "2"), ("B2", "3"), ("A1", "=B1+B2")]);
        assert_eq!(value_at(&sheet, "A1"), Value::Number(5.0));
    }

    #[test]
    fn test_disallowed_token_rejection() {
        let sheet = sheet(&[
            ("A1", "=DELETE(1)"),
            ("A2", "=alert(1)"),
            ("A3", "=constructor"),
            ("A4", "=1;2"),
        ]);
        for addr in ["A1", "A2", "A3", "A4"] {
            assert_eq!(value_at(&sheet, addr), Value::Error(Sentinel::Name), "{addr}");
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let sheet = sheet(&[
            ("A1", "10"),
            ("A2", "=A1*2"),
            ("A3", "=SUM(A1:A2)"),
            ("B1", "=B2"),
            ("B2", "=B1"),
            ("C1", "=1/0"),
            ("C2", "text"),
        ]);
        let first = sheet.recompute_all();
        let second = sheet.recompute_all();
        assert_eq!(first, second);
        assert_eq!(first.display(&CellRef::new(0, 2)), "30");
    }

    #[test]
    fn test_precedence_through_formulas() {
        let sheet = sheet(&[("A1", "2"), ("A2", "=A1 + 3 * 4"), ("A3", "=(A1 + 3) * 4")]);
        assert_eq!(value_at(&sheet, "A2"), Value::Number(14.0));
        assert_eq!(value_at(&sheet, "A3"), Value::Number(20.0));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let sheet = sheet(&[("A1", "=1/0"), ("A2", "=0/0")]);
        assert_eq!(value_at(&sheet, "A1").display(), "#ERROR!");
        assert_eq!(value_at(&sheet, "A2").display(), "#ERROR!");
    }

    #[test]
    fn test_malformed_expression_is_error() {
        let sheet = sheet(&[("A1", "=1+"), ("A2", "=(1"), ("A3", "=1..2")]);
        for addr in ["A1", "A2", "A3"] {
            assert_eq!(value_at(&sheet, addr), Value::Error(Sentinel::Eval), "{addr}");
        }
    }

    #[test]
    fn test_edit_then_recompute() {
        let mut sheet = sheet(&[("A1", "1"), ("A2", "=A1+1")]);
        assert_eq!(sheet.recompute_all().display(&CellRef::new(0, 1)), "2");

        sheet.set(CellRef::new(0, 0), "41");
        assert_eq!(sheet.recompute_all().display(&CellRef::new(0, 1)), "42");

        sheet.set(CellRef::new(0, 0), "");
        assert!(sheet.get(&CellRef::new(0, 0)).is_none());
        assert_eq!(sheet.recompute_all().display(&CellRef::new(0, 1)), "1");
    }

    #[test]
    fn test_fractional_display() {
        let sheet = sheet(&[("A1", "=1/4"), ("A2", "=0.1+0.2"), ("A3", "=7/2*2")]);
        let display = sheet.recompute_all();
        assert_eq!(display.display(&CellRef::new(0, 0)), "0.25");
        assert_eq!(display.display(&CellRef::new(0, 1)), "0.30000000000000004");
        assert_eq!(display.display(&CellRef::new(0, 2)), "7");
    }

    #[test]
    fn test_evaluate_formula_without_storing() {
        let sheet = sheet(&[("A1", "3"), ("A2", "4")]);
        assert_eq!(sheet.evaluate_formula("=SUM(A1:A2)*2"), Value::Error(Sentinel::Name));
        assert_eq!(sheet.evaluate_formula("=SUM(A1:A2)"), Value::Number(7.0));
        assert_eq!(sheet.evaluate_formula("=A1*A2"), Value::Number(12.0));
        assert!(sheet.get(&CellRef::new(0, 2)).is_none());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let source = sheet(&[("A1", "1"), ("B2", "=A1+1")]);
        let mut restored = Sheet::default();
        assert_eq!(restored.load(source.snapshot()), 0);
        assert_eq!(restored.recompute_all(), source.recompute_all());
    }

    #[test]
    fn test_clear_empties_every_cell() {
        let mut sheet = sheet(&[("A1", "1"), ("B2", "=A1+1")]);
        sheet.clear();
        assert!(sheet.snapshot().is_empty());
        assert_eq!(value_at(&sheet, "B2"), Value::Text(String::new()));
        assert!(sheet.recompute_all().populated().next().is_none());
    }

    #[test]
    fn test_long_chain_recomputes_exactly() {
        // A1 -> A100 -> B1 -> B100 -> C1 -> C100, 300 cells in all.
        let mut sheet = Sheet::default();
        let cells: Vec<CellRef> = (0..300).map(|i| CellRef::new(i / 100, i % 100)).collect();
        for pair in cells.windows(2) {
            sheet.set(pair[0], format!("={}+1", pair[1]));
        }
        sheet.set(cells[299], "1");

        assert_eq!(value_at(&sheet, "A1"), Value::Number(300.0));
        let display = sheet.recompute_all();
        assert_eq!(display.display(&CellRef::new(0, 0)), "300");
        assert_eq!(display.display(&CellRef::new(1, 0)), "200");
        assert_eq!(display.display(&CellRef::new(2, 0)), "100");
        assert_eq!(display.display(&CellRef::new(2, 99)), "1");
    }
}
