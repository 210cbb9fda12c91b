// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Quick fixes from the diagnostics an editor echoes back.

use std::collections::HashMap;

use tower_lsp::lsp_types::*;

use crate::diagnostics::ReplacementData;

/// Whether `selection` lies inside `diagnostic` on a single line.
///
/// A selection whose end is before its start matches nothing, as does
/// anything spanning more than one line.
pub fn selection_within(selection: Range, diagnostic: Range) -> bool {
    if selection.end < selection.start {
        return false;
    }
    if selection.start.line != selection.end.line || diagnostic.start.line != diagnostic.end.line {
        return false;
    }
    diagnostic.start.line == selection.start.line
        && selection.start.character >= diagnostic.start.character
        && selection.end.character <= diagnostic.end.character
}

/// Replacement strings stored on a diagnostic, empty when it has none.
pub fn replacements_of(diagnostic: &Diagnostic) -> Vec<String> {
    diagnostic
        .data
        .clone()
        .and_then(|data| serde_json::from_value::<ReplacementData>(data).ok())
        .map(|data| data.replacements)
        .unwrap_or_default()
}

/// One quick fix per replacement of every diagnostic under `selection`.
///
/// The edit replaces the diagnostic's whole range, not just the selection.
pub fn resolve_code_actions(
    uri: &Url,
    selection: Range,
    diagnostics: &[Diagnostic],
) -> Vec<CodeActionOrCommand> {
    let mut actions = Vec::new();

    for diag in diagnostics {
        if !selection_within(selection, diag.range) {
            continue;
        }

        for (i, replacement) in replacements_of(diag).into_iter().enumerate() {
            let text_edit = TextEdit::new(diag.range, replacement.clone());

            let mut changes = HashMap::new();
            changes.insert(uri.clone(), vec![text_edit]);

            let action = CodeAction {
                title: format!("replace with {}", replacement),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![diag.clone()]),
                edit: Some(WorkspaceEdit {
                    changes: Some(changes),
                    document_changes: None,
                    change_annotations: None,
                }),
                command: None,
                is_preferred: Some(i == 0),
                disabled: None,
                data: None,
            };

            actions.push(CodeActionOrCommand::CodeAction(action));
        }
    }

    actions
}
