//! Google Sheets row store.
//!
//! Talks to the Sheets v4 values API. Reads cover `{sheet}!A2:K`; a write
//! covers exactly as many columns as values given, starting at column A.

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use rowcall_core::{RowPosition, RowcallError, RowcallResult, SheetConfig, StoreError};
use rowcall_storage::RowStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Last column read by `read_rows`. Columns past H are carried through but
/// never written.
const READ_LAST_COLUMN: &str = "K";

// ============================================================================
// CREDENTIALS
// ============================================================================

/// Where bearer tokens for the Sheets API come from.
#[derive(Clone)]
pub enum TokenSource {
    /// Google OAuth provider. Refreshes and caches tokens itself.
    Google(Arc<dyn TokenProvider>),
    /// Fixed token, for tests and local emulators.
    Static(String),
}

impl TokenSource {
    /// Service-account key file, as downloaded from the Google console.
    pub fn service_account_file(path: &Path) -> RowcallResult<Self> {
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            StoreError::Credentials {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(TokenSource::Google(Arc::new(account)))
    }

    async fn token(&self) -> RowcallResult<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Google(provider) => {
                let token = provider.token(&[SHEETS_SCOPE]).await.map_err(|e| {
                    StoreError::Auth {
                        reason: format!("failed to get Sheets access token: {}", e),
                    }
                })?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Google(_) => f.write_str("TokenSource::Google"),
            TokenSource::Static(_) => f.write_str("TokenSource::Static"),
        }
    }
}

// ============================================================================
// A1 NOTATION
// ============================================================================

/// Column letter for a 1-based column number: 1 → A, 26 → Z, 27 → AA.
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Range covering `width` cells of one row, starting at column A.
pub fn row_range(sheet: &str, position: RowPosition, width: usize) -> String {
    let last = column_letter(width.max(1));
    format!("{}!A{}:{}{}", sheet, position, last, position)
}

fn read_range(sheet: &str) -> String {
    format!(
        "{}!A{}:{}",
        sheet,
        RowPosition::FIRST_DATA_ROW,
        READ_LAST_COLUMN
    )
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: [&'a [String]; 1],
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Row store backed by one tab of a Google spreadsheet.
pub struct SheetsRowStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    tokens: TokenSource,
}

impl SheetsRowStore {
    pub fn new(config: &SheetConfig, client: Client, tokens: TokenSource) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            tokens,
        }
    }

    /// Build the store from config, loading the service-account key file.
    pub fn from_config(config: &SheetConfig, client: Client) -> RowcallResult<Self> {
        let tokens = TokenSource::service_account_file(&config.credentials_path)?;
        tracing::info!(
            credentials = %config.credentials_path.display(),
            spreadsheet_id = %config.spreadsheet_id,
            sheet = %config.sheet_name,
            "Loaded service account for Sheets"
        );
        Ok(Self::new(config, client, tokens))
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }
}

async fn check_status(response: reqwest::Response) -> RowcallResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    }
    .into())
}

fn transport_failed(e: reqwest::Error) -> RowcallError {
    StoreError::Transport {
        reason: e.to_string(),
    }
    .into()
}

#[async_trait]
impl RowStore for SheetsRowStore {
    async fn read_rows(&self) -> RowcallResult<Vec<Vec<String>>> {
        let token = self.tokens.token().await?;
        let range = read_range(&self.sheet_name);
        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_failed)?;
        let response = check_status(response).await?;

        let body: ValueRange = response.json().await.map_err(|e| StoreError::Decode {
            reason: e.to_string(),
        })?;
        let rows = body
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect::<Vec<Vec<String>>>();
        tracing::debug!(range = %range, rows = rows.len(), "Read rows from sheet");
        Ok(rows)
    }

    async fn update_row(&self, position: RowPosition, values: &[String]) -> RowcallResult<()> {
        let token = self.tokens.token().await?;
        let range = row_range(&self.sheet_name, position, values.len());
        let body = ValueRangeUpdate {
            range: &range,
            major_dimension: "ROWS",
            values: [values],
        };
        let response = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport_failed)?;
        check_status(response).await?;
        tracing::debug!(range = %range, "Updated sheet row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::path::PathBuf;

    fn config(base_url: &str) -> SheetConfig {
        SheetConfig {
            spreadsheet_id: "sheet-1".to_string(),
            sheet_name: "Sheet1".to_string(),
            credentials_path: PathBuf::from("./missing.json"),
            base_url: base_url.to_string(),
        }
    }

    fn store(base_url: &str) -> SheetsRowStore {
        SheetsRowStore::new(
            &config(base_url),
            Client::new(),
            TokenSource::Static("token-1".to_string()),
        )
    }

    fn pos(n: u32) -> RowPosition {
        RowPosition::new(n).expect("data row")
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(7), "G");
        assert_eq!(column_letter(8), "H");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_row_range_width_follows_value_count() {
        assert_eq!(row_range("Sheet1", pos(2), 7), "Sheet1!A2:G2");
        assert_eq!(row_range("Sheet1", pos(5), 8), "Sheet1!A5:H5");
        assert_eq!(read_range("Sheet1"), "Sheet1!A2:K");
    }

    #[test]
    fn test_cell_text_stringifies_scalars() {
        assert_eq!(cell_text(json!("x")), "x");
        assert_eq!(cell_text(json!(15551234567_u64)), "15551234567");
        assert_eq!(cell_text(json!(true)), "true");
        assert_eq!(cell_text(json!(null)), "");
    }

    #[tokio::test]
    async fn test_read_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/v4/spreadsheets/sheet-1/values/Sheet1(!|%21)A2(:|%3A)K$".into()),
            )
            .match_header("authorization", "Bearer token-1")
            .with_status(200)
            .with_body(
                json!({
                    "range": "Sheet1!A2:K3",
                    "majorDimension": "ROWS",
                    "values": [["u1", "+15551234567", "Sam"], ["u2", 42]]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let rows = store(&server.url()).read_rows().await.expect("rows");
        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["u1", "+15551234567", "Sam"]);
        assert_eq!(rows[1], vec!["u2", "42"]);
    }

    #[tokio::test]
    async fn test_read_empty_sheet() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v4/spreadsheets/".into()))
            .with_status(200)
            .with_body(r#"{"range":"Sheet1!A2:K","majorDimension":"ROWS"}"#)
            .create_async()
            .await;

        let rows = store(&server.url()).read_rows().await.expect("rows");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_is_store_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v4/spreadsheets/".into()))
            .with_status(403)
            .with_body("PERMISSION_DENIED")
            .create_async()
            .await;

        let err = store(&server.url()).read_rows().await.expect_err("denied");
        assert!(matches!(
            err,
            RowcallError::Store(StoreError::Status { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_row_uses_raw_input_and_exact_range() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "PUT",
                Matcher::Regex(r"^/v4/spreadsheets/sheet-1/values/Sheet1(!|%21)A3(:|%3A)H3".into()),
            )
            .match_query(Matcher::UrlEncoded(
                "valueInputOption".into(),
                "RAW".into(),
            ))
            .match_body(Matcher::PartialJson(json!({
                "range": "Sheet1!A3:H3",
                "values": [["u2", "+1", "Ravi", "completed", "ex-2", "hello", "ts", "high"]]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let values: Vec<String> = ["u2", "+1", "Ravi", "completed", "ex-2", "hello", "ts", "high"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        store(&server.url())
            .update_row(pos(3), &values)
            .await
            .expect("update");
        mock.assert_async().await;
    }

    #[test]
    fn test_from_config_loads_service_account_key() {
        let mut config = config("http://localhost");
        config.credentials_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/service_account.json");

        let store = SheetsRowStore::from_config(&config, Client::new()).expect("fixture key");
        assert!(matches!(store.tokens, TokenSource::Google(_)));
    }

    #[tokio::test]
    async fn test_static_token_is_sent_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/v4/spreadsheets/".into()))
            .match_header("authorization", "Bearer token-1")
            .with_status(200)
            .with_body(r#"{"values":[["u1"]]}"#)
            .expect(2)
            .create_async()
            .await;

        let store = store(&server.url());
        store.read_rows().await.expect("first read");
        store.read_rows().await.expect("second read");
        mock.assert_async().await;
    }

    #[test]
    fn test_missing_credentials_file() {
        let err = SheetsRowStore::from_config(&config("http://localhost"), Client::new())
            .err()
            .expect("missing key file");
        assert!(matches!(
            err,
            RowcallError::Store(StoreError::Credentials { .. })
        ));
    }
}
