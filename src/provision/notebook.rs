//! Notebook import into workspace folders.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	client::{Verb, WorkspaceClient},
};

const WORKSPACE_IMPORT_PATH: &str = "/workspace/import";

/// Source language of an imported notebook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotebookLanguage {
	/// Python notebook.
	Python,
	/// Scala notebook.
	Scala,
	/// SQL notebook.
	Sql,
	/// R notebook.
	R,
}

/// Encoding of an imported notebook payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotebookFormat {
	/// Plain source file.
	Source,
	/// Exported HTML document.
	Html,
	/// Jupyter notebook document.
	Jupyter,
	/// Databricks archive.
	Dbc,
}

#[derive(Serialize)]
struct NotebookImport<'a> {
	path: &'a str,
	format: NotebookFormat,
	language: NotebookLanguage,
	content: String,
	overwrite: bool,
}

impl WorkspaceClient {
	/// Imports notebook content into a workspace path.
	///
	/// `content` is the raw notebook bytes; the transport encoding happens here. Reading the
	/// bytes from wherever they live (a git checkout, an archive) is the caller's concern.
	pub async fn import_notebook(
		&self,
		dest_path: &str,
		language: NotebookLanguage,
		format: NotebookFormat,
		content: &[u8],
		overwrite: bool,
	) -> Result<()> {
		let payload = NotebookImport {
			path: dest_path,
			format,
			language,
			content: STANDARD.encode(content),
			overwrite,
		};

		self.invoke(Verb::Post, WORKSPACE_IMPORT_PATH, &payload).await?;

		tracing::info!(dest_path, "Imported a notebook.");

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn languages_and_formats_serialize_to_wire_names() {
		assert_eq!(
			serde_json::to_string(&NotebookLanguage::Python).expect("Language should serialize."),
			"\"PYTHON\"",
		);
		assert_eq!(
			serde_json::to_string(&NotebookFormat::Dbc).expect("Format should serialize."),
			"\"DBC\"",
		);
	}
}
