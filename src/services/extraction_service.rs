// src/services/extraction_service.rs

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

use crate::{
    common::error::AppError,
    models::{invoice::Category, transfer::ImportedInvoice},
    services::csv_service::parse_import_date,
};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Quem transforma um PDF arbitrário em faturas estruturadas.
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
    /// Modelo em uso, ou `None` se a extração não está configurada.
    fn model(&self) -> Option<&str>;

    async fn extract(&self, pdf: &[u8]) -> Result<Vec<ImportedInvoice>, AppError>;
}

// --- Formato da API generateContent ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
    Text(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// Uma fatura como o modelo devolve: tudo opcional (ausente ou null), validado depois.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedRow {
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    invoice_number: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Clone)]
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiExtractor {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    async fn generate(&self, api_key: &str, pdf: &[u8]) -> anyhow::Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        mime_type: "application/pdf".to_string(),
                        data: STANDARD.encode(pdf),
                    },
                    Part::Text(extraction_prompt().to_string()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let response = self
            .client
            .post(format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini error {}: {}", status, body));
        }

        let body: GenerateResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "o modelo não retornou texto; o documento pode estar ilegível"
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl InvoiceExtractor for GeminiExtractor {
    fn model(&self) -> Option<&str> {
        self.api_key.as_ref().map(|_| self.model.as_str())
    }

    async fn extract(&self, pdf: &[u8]) -> Result<Vec<ImportedInvoice>, AppError> {
        let api_key = self.api_key.as_deref().ok_or(AppError::ExtractionDisabled)?;

        tracing::info!("📄 Enviando PDF ({} bytes) para {}", pdf.len(), self.model);
        let raw = self
            .generate(api_key, pdf)
            .await
            .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;

        parse_extraction(&raw)
    }
}

/// Remove cercas de markdown (```json ... ```) que o modelo às vezes adiciona.
pub fn strip_markdown_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Converte a resposta do modelo em faturas. Sem o array `invoices` é erro;
/// categorias fora da lista viram a padrão; linhas incompletas são descartadas.
pub fn parse_extraction(raw: &str) -> Result<Vec<ImportedInvoice>, AppError> {
    let parsed: Value = serde_json::from_str(strip_markdown_fences(raw))
        .map_err(|e| AppError::ExtractionFailed(format!("JSON inválido: {}", e)))?;

    let rows = match parsed.get("invoices") {
        Some(Value::Array(rows)) => rows.clone(),
        _ => {
            return Err(AppError::ExtractionFailed(
                "a resposta não contém um array 'invoices' válido".to_string(),
            ))
        }
    };

    let mut imported = Vec::new();
    for row in rows {
        let row: ExtractedRow = match serde_json::from_value(row) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Linha extraída ignorada: {}", e);
                continue;
            }
        };

        let date = parse_import_date(row.date.as_deref().unwrap_or_default()).ok().flatten();
        if let Some(invoice) = ImportedInvoice::accept(
            row.supplier.as_deref().unwrap_or_default(),
            row.invoice_number.as_deref().unwrap_or_default(),
            date,
            amount_from_value(&row.amount),
            row.description.as_deref().unwrap_or_default(),
            Category::parse_or_default(row.category.as_deref().unwrap_or_default()),
        ) {
            imported.push(invoice);
        }
    }

    Ok(imported)
}

fn amount_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn extraction_prompt() -> &'static str {
    "Analyze the provided invoice PDF. Extract all relevant invoice details for every invoice \
     in the document. The total amount must be the final amount, including any taxes or VAT. \
     Return the data as a JSON object that strictly follows the provided schema. \
     Ensure the date is in YYYY-MM-DD format."
}

fn response_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "invoices": {
                "type": "ARRAY",
                "description": "An array of invoice objects extracted from the document.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "supplier": { "type": "STRING", "description": "The name of the company sending the invoice." },
                        "invoiceNumber": { "type": "STRING", "description": "The unique identifier for the invoice." },
                        "date": { "type": "STRING", "description": "The issue date of the invoice in YYYY-MM-DD format." },
                        "amount": { "type": "NUMBER", "description": "The final total amount of the invoice, including taxes." },
                        "description": { "type": "STRING", "description": "A brief summary of the items or services." },
                        "category": {
                            "type": "STRING",
                            "description": format!(
                                "Classify the invoice into one of the following categories: {}",
                                categories.join(", ")
                            )
                        }
                    },
                    "required": ["supplier", "invoiceNumber", "date", "amount"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_markdown_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_markdown_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_markdown_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn unknown_categories_fall_back_to_general() {
        let raw = r#"```json
        {"invoices": [
            {"supplier": "Digital Marketing Experts", "invoiceNumber": "DM-12", "date": "2025-02-14",
             "amount": 1240.5, "description": "Campaign", "category": "Marketing"},
            {"supplier": "Logistics Hellas", "invoiceNumber": "LH-3", "date": "2025-02-15",
             "amount": "80", "category": "Ταξίδια"}
        ]}
        ```"#;
        let imported = parse_extraction(raw).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].category, Category::General);
        assert_eq!(imported[0].amount, Decimal::new(12405, 1));
        assert_eq!(imported[0].date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
        assert_eq!(imported[1].category, Category::Travel);
        assert_eq!(imported[1].description, "");
    }

    #[test]
    fn missing_invoices_array_is_an_error() {
        assert!(matches!(
            parse_extraction(r#"{"items": []}"#),
            Err(AppError::ExtractionFailed(_))
        ));
        assert!(matches!(parse_extraction("not json"), Err(AppError::ExtractionFailed(_))));
    }

    #[test]
    fn incomplete_rows_are_dropped() {
        let raw = r#"{"invoices": [
            {"supplier": "", "invoiceNumber": "X", "date": "2025-01-01", "amount": 5},
            {"supplier": "ACME", "invoiceNumber": "Y", "date": "someday", "amount": 5},
            {"supplier": "ACME", "invoiceNumber": "Z", "date": "2025-01-01", "amount": 0},
            {"supplier": "ACME", "invoiceNumber": "W", "date": "2025-01-01", "amount": 9}
        ]}"#;
        let numbers: Vec<String> = parse_extraction(raw)
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        assert_eq!(numbers, vec!["W"]);
    }

    #[test]
    fn null_optional_fields_keep_the_row() {
        let raw = r#"{"invoices": [
            {"supplier": "Office Supplies Inc.", "invoiceNumber": "OS-44", "date": "2025-06-30",
             "amount": 18.9, "description": null, "category": null}
        ]}"#;
        let imported = parse_extraction(raw).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].description, "");
        assert_eq!(imported[0].category, Category::General);
    }

    #[test]
    fn schema_lists_every_category() {
        let schema = response_schema().to_string();
        for category in Category::ALL {
            assert!(schema.contains(category.label()));
        }
    }

    #[tokio::test]
    async fn extraction_without_api_key_is_disabled() {
        let extractor = GeminiExtractor::new(None, "gemini-2.5-flash".into());
        assert!(extractor.model().is_none());
        assert!(matches!(
            extractor.extract(b"%PDF-1.4").await,
            Err(AppError::ExtractionDisabled)
        ));
    }
}
