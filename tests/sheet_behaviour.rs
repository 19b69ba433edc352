//! End-to-end behaviour of the sheet through the public API.

use pretty_assertions::assert_eq;
use tabula::{FormulaError, Position, Sheet, SheetError, Size, Value};

fn pos(name: &str) -> Position {
    Position::from_a1(name).unwrap()
}

fn value(sheet: &Sheet, name: &str) -> Option<Value> {
    sheet
        .get_cell(pos(name))
        .unwrap()
        .map(|cell| cell.value().clone())
}

fn text(sheet: &Sheet, name: &str) -> Option<String> {
    sheet.get_cell(pos(name)).unwrap().map(|cell| cell.text())
}

fn texts(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.print_texts(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_cycle_between_two_cells_rejected() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    sheet.set_cell(pos("B1"), "=2").unwrap();

    let err = sheet.set_cell(pos("B1"), "=A1").unwrap_err();
    assert!(matches!(err, SheetError::CircularDependency { .. }));

    assert_eq!(text(&sheet, "A1").as_deref(), Some("=B1"));
    assert_eq!(text(&sheet, "B1").as_deref(), Some("=2"));
    assert_eq!(
        sheet.get_cell(pos("B1")).unwrap().unwrap().dependents(),
        vec![pos("A1")]
    );
    assert!(!sheet.get_cell(pos("A1")).unwrap().unwrap().is_referenced());
    assert_eq!(value(&sheet, "A1"), Some(Value::Number(2.0)));
}

#[test]
fn test_rejected_cycles_leave_sheet_unchanged() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1+1").unwrap();
    sheet.set_cell(pos("B1"), "=C1").unwrap();
    let before = texts(&sheet);
    let count = sheet.cell_count();

    // C1 exists only as a placeholder; D1 does not exist at all.
    assert!(sheet.set_cell(pos("C1"), "=A1").is_err());
    assert_eq!(text(&sheet, "C1").as_deref(), Some(""));

    sheet.set_cell(pos("D1"), "=A1").unwrap();
    sheet.clear_cell(pos("D1")).unwrap();
    assert!(sheet.set_cell(pos("C1"), "=D1").is_ok());
    assert!(sheet.set_cell(pos("D1"), "=A1").is_err());
    assert!(sheet.get_cell(pos("D1")).unwrap().unwrap().content().is_empty());

    sheet.clear_cell(pos("C1")).unwrap();
    assert_eq!(texts(&sheet), before);
    assert_eq!(sheet.cell_count(), count);
}

#[test]
fn test_cache_coherence_after_upstream_edit() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=10").unwrap();
    sheet.set_cell(pos("B1"), "=A1/4").unwrap();
    assert_eq!(value(&sheet, "B1"), Some(Value::Number(2.5)));

    sheet.set_cell(pos("A1"), "=-2").unwrap();
    assert_eq!(value(&sheet, "B1"), Some(Value::Number(-0.5)));

    sheet.set_cell(pos("A1"), "=0").unwrap();
    assert_eq!(value(&sheet, "B1"), Some(Value::Number(0.0)));

    sheet.set_cell(pos("B1"), "=1/A1").unwrap();
    assert_eq!(value(&sheet, "B1"), Some(Value::Error(FormulaError::Arithmetic)));
}

#[test]
fn test_formula_text_round_trip_is_idempotent() {
    let mut sheet = Sheet::new();
    for input in ["=(A2 + B2) * 3", "=1-(2-3)", "=-(C3)/(D4*2)", "=.5e1"] {
        sheet.set_cell(pos("A1"), input).unwrap();
        let first = text(&sheet, "A1").unwrap();
        sheet.set_cell(pos("A1"), &first).unwrap();
        assert_eq!(text(&sheet, "A1").unwrap(), first);
    }
    assert_eq!(text(&sheet, "A1").as_deref(), Some("=5"));
}

#[test]
fn test_plain_text_round_trips_unchanged() {
    let mut sheet = Sheet::new();
    for input in ["plain", " padded ", "=", "'quoted", "12.5", "tab\tinside"] {
        sheet.set_cell(pos("B2"), input).unwrap();
        assert_eq!(text(&sheet, "B2").as_deref(), Some(input));
    }
}

#[test]
fn test_escape_marker_stripped_from_value_only() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'123").unwrap();
    assert_eq!(value(&sheet, "A1"), Some(Value::from("123")));
    assert_eq!(text(&sheet, "A1").as_deref(), Some("'123"));
}

#[test]
fn test_bounding_box() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));

    sheet.set_cell(Position::new(0, 0), "x").unwrap();
    sheet.set_cell(Position::new(2, 3), "y").unwrap();
    assert_eq!(sheet.printable_size(), Size::new(3, 4));

    sheet.clear_cell(Position::new(2, 3)).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(1, 1));
}

#[test]
fn test_clearing_referenced_cell_keeps_formula_intact() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=4").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    sheet.set_cell(pos("A1"), "").unwrap();

    let b1 = sheet.get_cell(pos("B1")).unwrap().unwrap();
    assert_eq!(b1.text(), "=A1");
    assert_eq!(b1.referenced_cells(), &[pos("A1")]);
    assert_eq!(b1.value(), &Value::Number(0.0));
}

#[test]
fn test_invalid_positions_rejected_everywhere() {
    let mut sheet = Sheet::new();
    let bad = Position::new(0, Position::MAX_COLS);
    assert!(matches!(sheet.set_cell(bad, "x"), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.get_cell(bad), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.get_cell_mut(bad), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.clear_cell(bad), Err(SheetError::InvalidPosition(_))));
    assert!(sheet.is_empty());
}

#[test]
fn test_long_chain_recomputes() {
    let mut sheet = Sheet::new();
    sheet.set_cell(Position::new(0, 0), "=1").unwrap();
    for row in 1..200 {
        let prev = Position::new(row - 1, 0);
        sheet
            .set_cell(Position::new(row, 0), &format!("={}+1", prev))
            .unwrap();
    }
    let last = Position::new(199, 0);
    assert_eq!(
        sheet.get_cell(last).unwrap().unwrap().value(),
        &Value::Number(200.0)
    );

    sheet.set_cell(Position::new(0, 0), "=101").unwrap();
    assert_eq!(
        sheet.get_cell(last).unwrap().unwrap().value(),
        &Value::Number(300.0)
    );

    let err = sheet.set_cell(Position::new(0, 0), &format!("={}", last)).unwrap_err();
    match err {
        SheetError::CircularDependency { path, .. } => assert_eq!(path.len(), 201),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_chain_longer_than_call_stack_evaluates() {
    let rows = 5000;
    let mut sheet = Sheet::new();
    sheet.set_cell(Position::new(0, 0), "=1").unwrap();
    for row in 1..rows {
        let prev = Position::new(row - 1, 0);
        sheet
            .set_cell(Position::new(row, 0), &format!("={}+1", prev))
            .unwrap();
    }

    let last = Position::new(rows - 1, 0);
    assert_eq!(
        sheet.get_cell(last).unwrap().unwrap().value(),
        &Value::Number(rows as f64)
    );
    sheet.set_cell(Position::new(0, 0), "=0").unwrap();
    assert_eq!(
        sheet.get_cell(last).unwrap().unwrap().value(),
        &Value::Number((rows - 1) as f64)
    );
}

#[test]
fn test_unrepresentable_formulas_rejected() {
    let mut sheet = Sheet::new();
    for input in ["=1e400", "=-1e999*2"] {
        assert!(matches!(
            sheet.set_cell(pos("A1"), input),
            Err(SheetError::FormulaParse(_))
        ));
    }

    let nested = format!("={}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(matches!(
        sheet.set_cell(pos("A1"), &nested),
        Err(SheetError::FormulaParse(_))
    ));
    assert!(sheet.is_empty());

    sheet.set_cell(pos("A1"), "=1e308").unwrap();
    let stored = text(&sheet, "A1").unwrap();
    sheet.set_cell(pos("A1"), &stored).unwrap();
    assert_eq!(text(&sheet, "A1").unwrap(), stored);
}

#[test]
fn test_sheet_behind_mutex() {
    let sheet = std::sync::Mutex::new(Sheet::new());
    std::thread::scope(|s| {
        s.spawn(|| {
            let mut guard = sheet.lock().unwrap();
            guard.set_cell(Position::new(0, 0), "=6*7").unwrap();
        });
    });
    let guard = sheet.lock().unwrap();
    assert_eq!(
        guard.get_cell(Position::new(0, 0)).unwrap().unwrap().value(),
        &Value::Number(42.0)
    );
}
