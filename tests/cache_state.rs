use statement_kit::source::SourceRef;

mod support;
use support::TestWorkspace;
use support::builders;

#[tokio::test(flavor = "current_thread")]
async fn cached_source_is_not_refetched() {
    let workspace = TestWorkspace::new();
    let path = workspace.create_workbook("bs.xlsx", |book| {
        builders::statement_workbook(book, "Balance Sheet");
    });
    let state = workspace.app_state();
    let source = SourceRef::parse(path.to_str().unwrap()).unwrap();

    let first = state.statement(&source, "Balance Sheet", false).await.unwrap();
    assert_eq!(first.rows[1].value("31-Dec-24"), Some(1_234_567.0));

    // Overwrite the fixture on disk; the cached parse must still be served.
    workspace.create_workbook("bs.xlsx", |book| {
        let sheet = builders::primary_sheet(book, "Balance Sheet");
        builders::balance_sheet(sheet);
        builders::amount(sheet, "B5", 42.0);
    });

    let cached = state.statement(&source, "Balance Sheet", false).await.unwrap();
    assert_eq!(cached.rows[1].value("31-Dec-24"), Some(1_234_567.0));

    let refreshed = state.statement(&source, "Balance Sheet", true).await.unwrap();
    assert_eq!(refreshed.rows[1].value("31-Dec-24"), Some(42.0));
}

#[tokio::test(flavor = "current_thread")]
async fn statement_cache_key_ignores_sheet_name_case() {
    let workspace = TestWorkspace::new();
    let path = workspace.create_workbook("bs.xlsx", |book| {
        builders::statement_workbook(book, "Balance Sheet");
    });
    let state = workspace.app_state();
    let source = SourceRef::parse(path.to_str().unwrap()).unwrap();

    state
        .statement(&source, "Balance Sheet", false)
        .await
        .unwrap();

    workspace.create_workbook("bs.xlsx", |book| {
        let sheet = builders::primary_sheet(book, "Balance Sheet");
        builders::balance_sheet(sheet);
        builders::amount(sheet, "B5", 7.0);
    });

    // Same sheet under a different case hits the warm entry.
    let cached = state
        .statement(&source, "balance sheet", false)
        .await
        .unwrap();
    assert_eq!(cached.rows[1].value("31-Dec-24"), Some(1_234_567.0));
}

#[tokio::test(flavor = "current_thread")]
async fn template_and_statement_caches_are_independent() {
    let workspace = TestWorkspace::new();
    let path = workspace.create_workbook("bs.xlsx", |book| {
        builders::statement_workbook(book, "Balance Sheet");
    });
    let state = workspace.app_state();
    let source = SourceRef::parse(path.to_str().unwrap()).unwrap();

    state
        .statement(&source, "Balance Sheet", false)
        .await
        .unwrap();

    workspace.create_workbook("bs.xlsx", |book| {
        let sheet = builders::primary_sheet(book, "Balance Sheet");
        builders::balance_sheet(sheet);
        builders::amount(sheet, "B5", 42.0);
    });

    // A statement parse does not warm the template cache: the template path
    // reads the updated file even though the statement entry is still warm.
    let template = state.template(&source, false).await.unwrap();
    let sheet = template.find_sheet("Balance Sheet").unwrap();
    assert_eq!(sheet.rows[4].cells[1].numeric, Some(42.0));

    let statement = state
        .statement(&source, "Balance Sheet", false)
        .await
        .unwrap();
    assert_eq!(statement.rows[1].value("31-Dec-24"), Some(1_234_567.0));
}

#[tokio::test(flavor = "current_thread")]
async fn evicting_a_source_drops_both_caches() {
    let workspace = TestWorkspace::new();
    let path = workspace.create_workbook("bs.xlsx", |book| {
        builders::statement_workbook(book, "Balance Sheet");
    });
    let state = workspace.app_state();
    let source = SourceRef::parse(path.to_str().unwrap()).unwrap();

    state.template(&source, false).await.unwrap();
    state
        .statement(&source, "Balance Sheet", false)
        .await
        .unwrap();

    workspace.create_workbook("bs.xlsx", |book| {
        let sheet = builders::primary_sheet(book, "Balance Sheet");
        builders::balance_sheet(sheet);
        builders::amount(sheet, "B5", 99.0);
    });
    state.evict_source(&source);

    let template = state.template(&source, false).await.unwrap();
    let sheet = template.find_sheet("Balance Sheet").unwrap();
    assert_eq!(sheet.rows[4].cells[1].numeric, Some(99.0));

    let statement = state
        .statement(&source, "Balance Sheet", false)
        .await
        .unwrap();
    assert_eq!(statement.rows[1].value("31-Dec-24"), Some(99.0));
}

#[tokio::test(flavor = "current_thread")]
async fn missing_file_surfaces_a_read_error() {
    let workspace = TestWorkspace::new();
    let state = workspace.app_state();
    let missing = workspace.path().join("absent.xlsx");
    let source = SourceRef::parse(missing.to_str().unwrap()).unwrap();

    let error = state.template(&source, false).await.unwrap_err();
    assert!(error.to_string().contains("absent.xlsx"));
}
