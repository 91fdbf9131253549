//! Interactive read-eval-print loop

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use hyrum_core::conversation::ChatSession;
use hyrum_core::knowledge::KnowledgeStore;

use crate::commands::Command;
use crate::display;

/// Run the loop until an exit command or end of input.
///
/// One line is read, handled and answered before the next is read.
pub async fn run<R, W>(
    session: &mut ChatSession,
    mut input: R,
    mut out: W,
    knowledge_path: &Path,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", display::banner())?;

    let mut line = String::new();
    loop {
        write!(out, "{}", display::PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            writeln!(out)?;
            writeln!(out, "{}", display::FAREWELL)?;
            break;
        }

        match Command::parse(&line) {
            Command::Exit => {
                writeln!(out, "{}", display::FAREWELL)?;
                break;
            }
            Command::History => {
                writeln!(out, "\n📜 Histórico da conversa:")?;
                write!(out, "{}", display::render_history(session.history()))?;
            }
            Command::Clear => {
                session.clear_history();
                writeln!(out, "Histórico limpo!")?;
            }
            Command::Knowledge => {
                write!(out, "{}", display::render_knowledge(session.knowledge()))?;
            }
            Command::Reload => match KnowledgeStore::load(knowledge_path) {
                Ok(store) => {
                    info!(topics = store.len(), "Knowledge base reloaded");
                    writeln!(out, "{}", display::load_notice(&store))?;
                    session.replace_knowledge(Arc::new(store));
                }
                Err(e) => {
                    writeln!(out, "❌ Não foi possível recarregar a base: {e}")?;
                }
            },
            Command::Help => writeln!(out, "{}", display::HELP)?,
            Command::Empty => continue,
            Command::Chat(text) => {
                let reply = session.send(&text).await;
                writeln!(out, "\n🤖 Bot: {reply}")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyrum_core::knowledge::DEFAULT_TOPIC;
    use hyrum_core::llm::{Message, SamplingParams, ScriptedProvider};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn session(provider: &ScriptedProvider, store: KnowledgeStore) -> ChatSession {
        ChatSession::new(
            Arc::new(provider.clone()),
            Arc::new(store),
            SamplingParams::default(),
        )
    }

    async fn drive(session: &mut ChatSession, script: &str, path: &Path) -> String {
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out, path).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_chat_then_exit() {
        let provider = ScriptedProvider::replying("Olá! 🎮");
        let mut session = session(&provider, KnowledgeStore::default_store());

        let out = drive(&mut session, "Oi\n\nsair\nnever read\n", Path::new("kb.json")).await;

        assert!(out.contains("🤖 Bot: Olá! 🎮"));
        assert!(out.ends_with(&format!("{}\n", display::FAREWELL)));
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_history_and_clear_commands() {
        let provider = ScriptedProvider::replying("resposta");
        let mut session = session(&provider, KnowledgeStore::default_store());
        session.add_system_message("persona");

        let out = drive(
            &mut session,
            "pergunta\nHISTORICO\nlimpar\n",
            Path::new("kb.json"),
        )
        .await;

        assert!(out.contains("1. [SYSTEM]: persona"));
        assert!(out.contains("2. [USER]: pergunta"));
        assert!(out.contains("3. [ASSISTANT]: resposta"));
        assert!(out.contains("Histórico limpo!"));
        assert!(session.history().is_empty());
        // end of input exits cleanly
        assert!(out.trim_end().ends_with(display::FAREWELL));
    }

    #[tokio::test]
    async fn test_base_command_lists_topics() {
        let provider = ScriptedProvider::replying("ok");
        let store =
            KnowledgeStore::from_json_str(r#"{"reembolso": {"texto_completo": "5 dias úteis"}}"#)
                .unwrap();
        let mut session = session(&provider, store);

        let out = drive(&mut session, "base\nsair\n", Path::new("kb.json")).await;

        assert!(out.contains("📚 BASE DE CONHECIMENTO DA LOJA:"));
        assert!(out.contains("🔹 REEMBOLSO:"));
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_reload_replaces_store() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(r#"{"troca": {"texto_completo": "7 dias"}}"#.as_bytes())
            .unwrap();

        let provider = ScriptedProvider::replying("ok");
        let mut session = session(&provider, KnowledgeStore::default_store());

        let out = drive(&mut session, "recarregar\nposso fazer troca?\nsair\n", file.path()).await;

        assert!(out.contains("✅ Termos carregados de"));
        assert!(session.knowledge().record("troca").is_some());
        assert!(session.history()[0].content.contains("🔹 TROCA: 7 dias"));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_old_store() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ broken").unwrap();

        let provider = ScriptedProvider::replying("ok");
        let mut session = session(&provider, KnowledgeStore::default_store());

        let out = drive(&mut session, "recarregar\nsair\n", file.path()).await;

        assert!(out.contains("❌ Não foi possível recarregar a base"));
        assert!(session.knowledge().record(DEFAULT_TOPIC).is_some());
    }

    #[tokio::test]
    async fn test_provider_error_printed_inline() {
        let provider = ScriptedProvider::failing("dns failure");
        let mut session = session(&provider, KnowledgeStore::default_store());

        let out = drive(&mut session, "Oi\nsair\n", Path::new("kb.json")).await;

        assert!(out.contains("🤖 Bot: Erro: "));
        assert_eq!(session.history(), &[Message::user("Oi")]);
    }
}
