//! Heuristic context annotation for user utterances.
//!
//! Pure keyword and time-of-day matching — each firing category appends one
//! fixed bracketed hint to the annotation string, in a fixed priority order.

/// One keyword category. Any listed keyword appearing in the lowercased
/// utterance appends the hint, at most once per category.
struct KeywordRule {
    keywords: &'static [&'static str],
    hint: &'static str,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Weather hints run ahead of the hour bucket.
const WEATHER_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["lluvia", "lloviendo"],
        hint: " [Clima lluvioso: recomienda museos, cafés, Recinto, Catedral] ",
    },
    KeywordRule {
        keywords: &["soleado", "sol"],
        hint: " [Clima soleado: recomienda actividades al aire libre como Nevado, Ecoparque, miradores] ",
    },
];

/// Topic hints run after the hour bucket, in this order.
const TOPIC_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["comer", "restaurantes"],
        hint: " [Usuario busca comida: recomienda bandeja paisa, mazamorra, café local] ",
    },
    KeywordRule {
        keywords: &["familia", "niños"],
        hint: " [Lugares familiares: Recinto, Yarumos, Bosque Popular, Termales] ",
    },
    KeywordRule {
        keywords: &["historia", "histórico", "iglesia"],
        hint: " [Lugares históricos: Catedral Basílica, Torre del Cable, museos] ",
    },
    KeywordRule {
        keywords: &["senderismo", "caminar", "ruta"],
        hint: " [Rutas naturales: La Toscana, Ecoparque Alcázares, Yarumos, Chipre] ",
    },
    KeywordRule {
        keywords: &["bailar", "baile", "discoteca", "bar", "fiesta", "noche"],
        hint: " [Vida nocturna: zonas de bares y discotecas en el centro, cafés con música en vivo] ",
    },
    KeywordRule {
        keywords: &["futbol", "fútbol", "once caldas", "partido", "estadio"],
        hint: " [IMPORTANTE: Deportes/fútbol ES turismo. Recomienda el Palogrande, Once Caldas, horarios de partidos.] ",
    },
];

const EVENING_HINT: &str = " [Es noche: evita senderismo, sugiere miradores, cafés seguros] ";
const MORNING_HINT: &str = " [Es mañana: recomienda caminatas, tours naturales] ";

/// Hours at or past this are "evening".
pub const EVENING_START_HOUR: u32 = 18;
/// Inclusive "morning" bucket.
pub const MORNING_HOURS: std::ops::RangeInclusive<u32> = 6..=11;

/// At most one hour hint: evening wins from 18:00, morning covers 6–11,
/// anything else gets none.
pub fn hour_hint(hour: u32) -> Option<&'static str> {
    if hour >= EVENING_START_HOUR {
        Some(EVENING_HINT)
    } else if MORNING_HOURS.contains(&hour) {
        Some(MORNING_HINT)
    } else {
        None
    }
}

/// Build the contextual annotation for an utterance at the given wall-clock
/// hour. Pure: identical inputs yield identical output.
pub fn annotate(utterance: &str, now_hour: u32) -> String {
    let lowered = utterance.to_lowercase();
    let mut context = String::new();

    for rule in WEATHER_RULES {
        if rule.matches(&lowered) {
            context.push_str(rule.hint);
        }
    }

    if let Some(hint) = hour_hint(now_hour) {
        context.push_str(hint);
    }

    for rule in TOPIC_RULES {
        if rule.matches(&lowered) {
            context.push_str(rule.hint);
        }
    }

    context
}
