use super::LineTransform;
use anyhow::Result;
use async_trait::async_trait;

/// 大文字変換の実装
#[derive(Debug, Clone, Default)]
pub struct UppercaseTransform;

impl UppercaseTransform {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LineTransform for UppercaseTransform {
    async fn transform_line(&self, line: &str) -> Result<String> {
        Ok(line.to_uppercase())
    }
}
