//! Upstream message assembly: system instructions on the first exchange,
//! a short replayed transcript afterwards.

use miza_core::turns::Turn;

/// System instructions prepended to a session's first exchange.
pub const SYSTEM_PROMPT: &str = "
Eres MIZA, asistente turístico de Manizales.

Reglas:
- Responde en 5-6 líneas máximo.
- Primera respuesta: \"Hola, soy MIZA 🏔️\".
- Luego solo saluda si el usuario dice su nombre.
- Temas permitidos: turismo, lugares, comida, deportes.
- Si está fuera de tema: \"Eso está fuera de mis temas. Soy especialista en turismo 🏔️\".
";

/// How many history turns are replayed ahead of the current utterance.
pub const RECENT_TURN_WINDOW: usize = 4;

/// First exchange: system instructions, then the enriched utterance.
pub fn first_turn(enriched_prompt: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nAhora responde al usuario:\n{enriched_prompt}")
}

/// Later exchanges: the recent transcript window, then the enriched
/// utterance as the final user line. With no history at all the enriched
/// utterance goes out alone.
pub fn with_history(history: &[Turn], enriched_prompt: &str) -> String {
    let start = history.len().saturating_sub(RECENT_TURN_WINDOW);
    let recent = &history[start..];

    if recent.is_empty() {
        return enriched_prompt.to_string();
    }

    let mut lines: Vec<String> = recent.iter().map(Turn::render).collect();
    lines.push(format!("Usuario: {enriched_prompt}"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_turn_embeds_system_prompt() {
        let message = first_turn("Hola, me llamo Ana");
        assert!(message.contains("Eres MIZA, asistente turístico de Manizales."));
        assert!(message.contains("Ahora responde al usuario:\nHola, me llamo Ana"));
    }

    #[test]
    fn empty_history_sends_prompt_alone() {
        assert_eq!(with_history(&[], "¿qué visito?"), "¿qué visito?");
    }

    #[test]
    fn history_rendered_as_labeled_lines() {
        let history = vec![Turn::user("hola"), Turn::model("Hola, soy MIZA 🏔️")];
        let message = with_history(&history, "¿y para comer?");
        assert_eq!(
            message,
            "Usuario: hola\nMIZA: Hola, soy MIZA 🏔️\nUsuario: ¿y para comer?"
        );
    }

    #[test]
    fn only_last_four_turns_replayed() {
        let history: Vec<Turn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("pregunta {i}"))
                } else {
                    Turn::model(format!("respuesta {i}"))
                }
            })
            .collect();
        let message = with_history(&history, "última");
        assert!(!message.contains("pregunta 4"));
        assert!(message.contains("pregunta 6"));
        assert!(message.contains("respuesta 9"));
        assert_eq!(message.lines().count(), RECENT_TURN_WINDOW + 1);
    }
}
