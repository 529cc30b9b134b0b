use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::plc::GeneratedCode;

#[derive(Serialize)]
struct GenerateRequest {
    description: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    structured_text: String,
    ladder_logic: String,
}

/// Network generation backend. Single request/response call: the description
/// goes out, a Structured Text artifact and a ladder artifact come back.
#[derive(Clone)]
pub struct HttpGenerator {
    client: Client,
    base_url: String,
}

impl HttpGenerator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate(&self, description: &str) -> Result<GeneratedCode> {
        let url = format!("{}/api/generate-plc-code", self.base_url);

        let request = GenerateRequest {
            description: description.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "generation request failed with status: {}",
                response.status()
            ));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(GeneratedCode {
            structured_text: body.structured_text,
            ladder_summary: body.ladder_logic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let generator = HttpGenerator::new("http://localhost:8080/");
        assert_eq!(generator.base_url(), "http://localhost:8080");
    }
}
