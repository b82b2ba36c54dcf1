//! Tests for the command-line PDF renderer
//!
//! `sh` stands in for the converter: it copies stdin to the output path.

#[cfg(test)]
mod tests {
    use crate::core::PdfRenderer;
    use crate::error::ServiceError;
    use crate::services::pdf::CommandPdfRenderer;

    fn copying_renderer() -> CommandPdfRenderer {
        CommandPdfRenderer::with_command("sh", ["-c", "cat > \"$0\"", "{output}"]).unwrap()
    }

    #[tokio::test]
    async fn test_html_is_written_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.pdf");

        copying_renderer()
            .render_to_file("<h1>Render failure</h1>", &output)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "<h1>Render failure</h1>");
    }

    #[tokio::test]
    async fn test_large_input_with_noisy_stderr_completes() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.pdf");
        // Fills the stderr pipe before reading any input.
        let renderer = CommandPdfRenderer::with_command(
            "sh",
            ["-c", "head -c 262144 /dev/zero >&2; cat > \"$0\"", "{output}"],
        )
        .unwrap();
        let html = "x".repeat(262_144);

        tokio::time::timeout(
            std::time::Duration::from_secs(30),
            renderer.render_to_file(&html, &output),
        )
        .await
        .expect("renderer stalled")
        .unwrap();

        assert_eq!(std::fs::metadata(&output).unwrap().len(), 262_144);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_external_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer =
            CommandPdfRenderer::with_command("sh", ["-c", "echo broken >&2; exit 3", "{output}"])
                .unwrap();

        let err = renderer
            .render_to_file("<p>x</p>", &dir.path().join("out.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::ExternalService(ref m) if m.contains("broken")));
    }

    #[tokio::test]
    async fn test_missing_program_is_external_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer =
            CommandPdfRenderer::with_command("definitely-not-a-pdf-renderer", ["{output}"])
                .unwrap();

        let err = renderer
            .render_to_file("<p>x</p>", &dir.path().join("out.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::ExternalService(_)));
    }

    #[test]
    fn test_args_without_output_placeholder_are_rejected() {
        assert!(CommandPdfRenderer::with_command("wkhtmltopdf", ["-", "fixed.pdf"]).is_err());
    }
}
