//! Text shown to the user

use hyrum_core::knowledge::{KnowledgeOrigin, KnowledgeStore};
use hyrum_core::llm::Message;

pub const FAREWELL: &str = "👋 Obrigado por usar nossos serviços! Tenha um ótimo dia!";

pub const PROMPT: &str = "\n👤 Você: ";

pub const HELP: &str = "Comandos: 'sair' para terminar | 'historico' para ver mensagens | \
'limpar' para limpar | 'base' para ver políticas | 'recarregar' para reler a base | \
'ajuda' para esta lista";

/// Startup banner
pub fn banner() -> String {
    format!(
        "🤖 John Parker - Especialista em Games & Atendimento ao Cliente\n{}\n{}",
        HELP,
        "=".repeat(80)
    )
}

/// One line describing where the knowledge base came from
pub fn load_notice(store: &KnowledgeStore) -> String {
    match store.origin() {
        KnowledgeOrigin::File(path) => {
            format!("✅ Termos carregados de {}!", path.display())
        }
        KnowledgeOrigin::Default { missing } => format!(
            "❌ Arquivo {} não encontrado. Usando termos padrão.",
            missing.display()
        ),
        KnowledgeOrigin::Inline => format!("✅ {} termos carregados.", store.len()),
    }
}

/// Numbered transcript, one block per message
pub fn render_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "(nenhuma mensagem)\n".to_string();
    }

    let separator = "-".repeat(50);
    messages
        .iter()
        .enumerate()
        .map(|(i, msg)| {
            format!(
                "{}. [{}]: {}\n{}\n",
                i + 1,
                msg.role.as_str().to_uppercase(),
                msg.content,
                separator
            )
        })
        .collect()
}

/// Every topic with its full text, or its other fields when it has none
pub fn render_knowledge(store: &KnowledgeStore) -> String {
    let mut out = format!("\n📚 BASE DE CONHECIMENTO DA LOJA:\n{}\n", "=".repeat(50));

    for record in store.records() {
        out.push_str(&format!("\n🔹 {}:\n", record.topic().to_uppercase()));
        if record.has_full_text() {
            out.push_str(&format!("   {}\n", record.full_text()));
        } else {
            let extra = serde_json::Value::Object(record.extra().clone());
            out.push_str(&format!("   {}\n", extra));
        }
    }

    out
}
