use askama::Template;
use axum::response::Html;

use crate::error::AppError;

#[derive(Template)]
#[template(path = "adamus_capital.html")]
pub struct IndexTemplate;

pub async fn page() -> Result<Html<String>, AppError> {
    Ok(Html(IndexTemplate.render()?))
}
