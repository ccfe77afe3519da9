//! Domain router
//!
//! Score = lane + action token + text keyword families (+ couplings)
//! + intent/mode bias + lane stickiness, then the risk clamp.
//! Scores are floored at zero; an all-zero card falls back to `core`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::weights::RouterWeights;
use crate::types::coerce::{as_token, field};
use crate::types::{
    Cognition, Domain, DomainRouting, DomainScores, Intent, Mode, NormalizedTurn, RiskTier,
    RouteOptions, RouteSignal, RoutingReason, SessionSnapshot,
};
use crate::ROUTE_MAX_SIGNALS;

lazy_static! {
    /// (domain, strong action pattern, weak action pattern)
    static ref ACTION_TABLE: Vec<(Domain, Regex, Regex)> = vec![
        (
            Domain::Ai,
            Regex::new(r"^(prompt|model|llm|agent|gpt)").unwrap(),
            Regex::new(r"(^|_)(ai|ml|neural|train(ing)?)($|_)").unwrap(),
        ),
        (
            Domain::Fin,
            Regex::new(r"^(budget|invest|portfolio|tax|stocks?)").unwrap(),
            Regex::new(r"(fin|price|cost|market|money)").unwrap(),
        ),
        (
            Domain::Law,
            Regex::new(r"^(contract|legal|compliance|gdpr)").unwrap(),
            Regex::new(r"(law|clause|privacy|regulat)").unwrap(),
        ),
        (
            Domain::Cyber,
            Regex::new(r"^(scan|threat|breach|incident|vuln)").unwrap(),
            Regex::new(r"(secur|malware|phish|ransom)").unwrap(),
        ),
        (
            Domain::Psychology,
            Regex::new(r"^(breathe|calm|grounding|check_?in)").unwrap(),
            Regex::new(r"(mood|feel|stress|anxi)").unwrap(),
        ),
        (
            Domain::English,
            Regex::new(r"^(rewrite|proofread|grammar|translate)").unwrap(),
            Regex::new(r"(write|essay|word|edit)").unwrap(),
        ),
        (
            Domain::Strategy,
            Regex::new(r"^(plan|roadmap|strategy|swot|okr)").unwrap(),
            Regex::new(r"(goal|prioriti|decide|launch)").unwrap(),
        ),
        (
            Domain::Music,
            Regex::new(r"^(top_?\d+|hot_?100|charts?|number_?1|year_?end|micro_?moments?|custom_story|story|sweet_moments)").unwrap(),
            Regex::new(r"(song|artist|album|radio|year|music)").unwrap(),
        ),
    ];

    /// One family per domain; each family scores once
    static ref KEYWORD_FAMILIES: Vec<(Domain, Regex)> = vec![
        (Domain::Ai, Regex::new(
            r"(?i)\b(ai|artificial intelligence|machine learning|ml|llms?|gpt|neural( net(work)?s?)?|model training|prompts?|chatbots?|agents?)\b"
        ).unwrap()),
        (Domain::Fin, Regex::new(
            r"(?i)\b(finance|financial|invest(ing|ment|ments)?|stocks?|portfolio|budget|tax(es)?|revenue|profit|loans?|interest rates?|crypto|inflation|pricing|mortgage)\b"
        ).unwrap()),
        (Domain::Law, Regex::new(
            r"(?i)\b(law|laws|legal|lawsuit|contracts?|liability|compliance|gdpr|regulations?|regulators?|attorney|lawyer|court|copyright|disclosure)\b"
        ).unwrap()),
        (Domain::Cyber, Regex::new(
            r"(?i)\b(breach(es)?|ransomware|malware|phishing|hack(ed|er|ers|ing)?|vulnerabilit(y|ies)|exploits?|firewall|encryption|cyber ?security|ddos|passwords?|incident response)\b"
        ).unwrap()),
        (Domain::Psychology, Regex::new(
            r"(?i)\b(anxiety|anxious|depress(ed|ion)|stress(ed)?|overwhelm(ed|ing)?|therapy|therapist|mental health|feelings?|emotions?|burn(ed|t)? ?out|motivation|lonely|grief|trauma|panic)\b"
        ).unwrap()),
        (Domain::English, Regex::new(
            r"(?i)\b(grammar|essay|spelling|punctuation|vocabulary|synonyms?|rewrite|proofread|paragraphs?|sentences?|wording|writing)\b"
        ).unwrap()),
        (Domain::Strategy, Regex::new(
            r"(?i)\b(strategy|strategic|roadmap|planning|prioriti[sz]e|competitive|competitors?|market entry|positioning|okrs?|go-to-market|growth plan|swot)\b"
        ).unwrap()),
        (Domain::Music, Regex::new(
            r"(?i)\b(songs?|albums?|artists?|bands?|charts?|top ?(10|40|100)|billboard|hits?|singles?|radio|music|lyrics|playlists?)\b"
        ).unwrap()),
    ];
}

/// Pairs that reinforce each other when both families fire
const COUPLINGS: [(Domain, Domain); 5] = [
    (Domain::Cyber, Domain::Law),
    (Domain::Ai, Domain::Strategy),
    (Domain::Fin, Domain::Law),
    (Domain::Ai, Domain::Cyber),
    (Domain::Psychology, Domain::English),
];

/// Domains the high-risk clamp caps
const HIGH_RISK_CAPPED: [Domain; 4] = [Domain::Cyber, Domain::Fin, Domain::Law, Domain::Ai];

/// Map a lane token to its domain
pub fn lane_domain(lane: &str) -> Option<Domain> {
    let domain = match lane {
        "ai" | "tech" | "ml" => Domain::Ai,
        "fin" | "finance" | "money" | "markets" => Domain::Fin,
        "law" | "legal" | "compliance" => Domain::Law,
        "cyber" | "security" | "infosec" => Domain::Cyber,
        "psychology" | "psych" | "wellbeing" | "mind" => Domain::Psychology,
        "english" | "writing" | "grammar" | "language" => Domain::English,
        "strategy" | "business" | "planning" => Domain::Strategy,
        "music" | "years" | "top10" | "charts" | "radio" | "story" | "stories" | "moments"
        | "nostalgia" => Domain::Music,
        "core" | "general" => Domain::Core,
        _ => return None,
    };
    Some(domain)
}

/// What the router reads from a Cognition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteContext {
    pub mode: Mode,
    pub intent: Intent,
    pub risk_tier: RiskTier,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self {
            mode: Mode::Architect,
            intent: Intent::Clarify,
            risk_tier: RiskTier::Low,
        }
    }
}

impl RouteContext {
    pub fn from_cognition(cog: &Cognition) -> Self {
        Self {
            mode: cog.mode,
            intent: cog.intent,
            risk_tier: cog.risk_tier,
        }
    }

    /// Read mode / intent / riskTier from any JSON value; unknown values use defaults
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            mode: as_token(field(value, &["mode"]))
                .as_deref()
                .and_then(Mode::parse)
                .unwrap_or(defaults.mode),
            intent: as_token(field(value, &["intent"]))
                .as_deref()
                .and_then(Intent::parse)
                .unwrap_or(defaults.intent),
            risk_tier: as_token(field(value, &["riskTier", "risk_tier"]))
                .as_deref()
                .and_then(RiskTier::parse)
                .unwrap_or(defaults.risk_tier),
        }
    }
}

/// Scores before selection, for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub raw: DomainScores,
    /// `raw` divided by its maximum
    pub normalized: DomainScores,
    /// Top raw score over the configured ceiling, clamped to [0, 1]
    pub strength: f64,
    pub signals: Vec<RouteSignal>,
}

#[derive(Debug, Clone, Default)]
pub struct DomainRouter {
    weights: RouterWeights,
}

impl DomainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: RouterWeights) -> Self {
        self.weights = weights;
        self
    }

    fn effective_weights(&self) -> RouterWeights {
        if self.weights.is_usable() {
            self.weights.clone()
        } else {
            warn!("router weights unusable, using defaults");
            RouterWeights::default()
        }
    }

    pub fn route(
        &self,
        turn: &NormalizedTurn,
        session: &SessionSnapshot,
        cog: &Cognition,
        opts: &RouteOptions,
    ) -> DomainRouting {
        self.route_with(turn, session, RouteContext::from_cognition(cog), opts)
    }

    pub fn route_with(
        &self,
        turn: &NormalizedTurn,
        session: &SessionSnapshot,
        ctx: RouteContext,
        opts: &RouteOptions,
    ) -> DomainRouting {
        let w = self.effective_weights();
        let card = score_card(turn, session, ctx, &w);
        let ranked = card.raw.ranked();
        // ranked always has Domain::COUNT entries
        let (primary, _) = ranked[0];

        let min_score = if opts.min_secondary_score.is_finite() {
            opts.min_secondary_score
        } else {
            crate::ROUTE_DEFAULT_MIN_SECONDARY_SCORE
        };
        let secondary: Vec<Domain> = ranked
            .iter()
            .skip(1)
            .filter(|(d, s)| *d != primary && *s > 0.0 && *s >= min_score)
            .take(opts.max_secondary)
            .map(|(d, _)| *d)
            .collect();

        let confidence = card.normalized.get(primary).clamp(0.0, 1.0);
        let signals = signal_tags(&card.signals);

        debug!(
            primary = primary.as_str(),
            secondary = secondary.len(),
            confidence,
            risk = ctx.risk_tier.as_str(),
            "routed turn"
        );

        DomainRouting {
            primary,
            secondary,
            reason: RoutingReason {
                confidence,
                signals,
            },
        }
    }

    /// Raw and normalized scores without selecting a primary
    pub fn score(
        &self,
        turn: &NormalizedTurn,
        session: &SessionSnapshot,
        ctx: RouteContext,
    ) -> ScoreCard {
        score_card(turn, session, ctx, &self.effective_weights())
    }
}

fn score_card(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    ctx: RouteContext,
    w: &RouterWeights,
) -> ScoreCard {
    let mut scores = DomainScores::default();
    let mut signals = Vec::new();

    // Lane
    if let Some(domain) = turn.lane_token().as_deref().and_then(lane_domain) {
        scores.add(domain, w.lane);
        signals.push(RouteSignal::Lane(domain));
    }

    // Action token
    if let Some(action) = turn.any_action_token() {
        for (domain, strong, weak) in ACTION_TABLE.iter() {
            let delta = if strong.is_match(&action) {
                w.action_strong
            } else if weak.is_match(&action) {
                w.action_weak
            } else {
                continue;
            };
            scores.add(*domain, delta);
            signals.push(RouteSignal::Action(*domain));
        }
    }

    // Keyword families and couplings
    let mut fired = [false; Domain::COUNT];
    for (domain, family) in KEYWORD_FAMILIES.iter() {
        if family.is_match(&turn.text) {
            fired[domain.index()] = true;
            scores.add(*domain, w.keyword_family);
            signals.push(RouteSignal::Keyword(*domain));
        }
    }
    for (a, b) in COUPLINGS {
        if fired[a.index()] && fired[b.index()] {
            let bonus = coupling_bonus(w, a, b);
            scores.add(a, bonus);
            scores.add(b, bonus);
            signals.push(RouteSignal::Coupling(a, b));
        }
    }

    // Intent / mode bias
    if ctx.intent == Intent::Stabilize {
        scores.add(Domain::Psychology, w.stabilize_psychology);
        scores.add(Domain::English, w.stabilize_english);
        scores.add(Domain::Core, w.stabilize_core);
        scores.add(Domain::Ai, -w.stabilize_suppress);
        scores.add(Domain::Cyber, -w.stabilize_suppress);
        signals.push(RouteSignal::StabilizeBias);
    }
    let directive_bias = match ctx.mode {
        Mode::Architect => w.architect_strategy,
        Mode::Transitional => w.transitional_strategy,
        Mode::User => 0.0,
    };
    if directive_bias != 0.0 {
        scores.add(Domain::Strategy, directive_bias);
        signals.push(RouteSignal::DirectiveBias);
    }

    // Stickiness toward the prior lane
    if let Some(domain) = session.lane_token().as_deref().and_then(lane_domain) {
        scores.add(domain, w.lane_stickiness);
        signals.push(RouteSignal::Sticky(domain));
    }

    // Risk clamp
    match ctx.risk_tier {
        RiskTier::High => {
            scores.add(Domain::Psychology, w.high_risk_psychology);
            scores.add(Domain::English, w.high_risk_english);
            scores.add(Domain::Core, w.high_risk_core);
            for domain in HIGH_RISK_CAPPED {
                let capped = scores.get(domain).min(w.high_risk_cap);
                scores.set(domain, capped);
            }
            signals.push(RouteSignal::RiskHigh);
        }
        RiskTier::Medium => {
            scores.add(Domain::Cyber, -w.medium_risk_cyber);
            signals.push(RouteSignal::RiskMedium);
        }
        RiskTier::Low => {}
    }

    scores.floor_zero();
    if scores.total() <= f64::EPSILON {
        scores.set(Domain::Core, 1.0);
        signals.push(RouteSignal::CoreFallback);
    }

    ScoreCard {
        raw: scores,
        normalized: scores.normalized(),
        strength: (scores.max() / w.score_ceiling).clamp(0.0, 1.0),
        signals,
    }
}

fn coupling_bonus(w: &RouterWeights, a: Domain, b: Domain) -> f64 {
    match (a, b) {
        (Domain::Cyber, Domain::Law) => w.couple_cyber_law,
        (Domain::Ai, Domain::Strategy) => w.couple_ai_strategy,
        (Domain::Fin, Domain::Law) => w.couple_fin_law,
        (Domain::Ai, Domain::Cyber) => w.couple_ai_cyber,
        (Domain::Psychology, Domain::English) => w.couple_psychology_english,
        _ => 0.0,
    }
}

/// Deduplicated, bounded tag list
fn signal_tags(signals: &[RouteSignal]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(ROUTE_MAX_SIGNALS);
    for signal in signals {
        let tag = signal.tag();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == ROUTE_MAX_SIGNALS {
            break;
        }
    }
    tags
}

/// Route with default weights
pub fn route_domain(
    turn: &NormalizedTurn,
    session: &SessionSnapshot,
    cog: &Cognition,
    opts: &RouteOptions,
) -> DomainRouting {
    DomainRouter::new().route(turn, session, cog, opts)
}

/// JSON entry point; `cog` only needs `mode`, `intent` and `riskTier`
pub fn route_value(turn: &Value, session: &Value, cog: &Value, opts: &Value) -> DomainRouting {
    DomainRouter::new().route_with(
        &NormalizedTurn::from_value(turn),
        &SessionSnapshot::from_value(session),
        RouteContext::from_value(cog),
        &RouteOptions::from_value(opts),
    )
}
