use std::io::{self, BufRead, Write};
use std::path::Path;

use stackviz_editor_lib::command::{execute_json, CommandResponse};
use stackviz_editor_lib::state::{EditorSettings, EditorState, SceneState};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stackviz_editor=info,stackviz_editor_lib=info,shared=info".into()),
        )
        .init();

    let mut editor = EditorState::with_settings(EditorSettings::load());
    if let Some(scene) = parse_scene_arg() {
        editor.load_scene(scene);
    } else if std::env::args().any(|a| a == "--restore") && SceneState::has_autosave() {
        if let Some(scene) = SceneState::load_autosave() {
            tracing::info!("Restored autosave ({} objects)", scene.objects.len());
            editor.load_scene(scene);
        }
    }

    // One JSON command per line in, one JSON response per line out
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = execute_json(&mut editor, &line).unwrap_or_else(|e| CommandResponse {
            success: false,
            error: Some(e),
            data: None,
        });
        let out = serde_json::to_string(&response).unwrap_or_default();
        if writeln!(stdout, "{out}").and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }

    editor.scene.autosave();
    editor.settings.save();
}

fn parse_scene_arg() -> Option<shared::SceneDescription> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            let path = &args[i + 1];
            match SceneState::read_scene(Path::new(path)) {
                Ok(scene) => {
                    tracing::info!("Loaded scene from {path} ({} objects)", scene.objects.len());
                    return Some(scene);
                }
                Err(e) => tracing::error!("Failed to load scene {path}: {e}"),
            }
            break;
        }
        i += 1;
    }
    None
}
