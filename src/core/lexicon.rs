//! Heuristic lexicons for mediation
//!
//! Compiled once; a `Lexicon` is cloned into each `Mediator` so tests can
//! inject their own tables. Regex clones share the compiled program.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // =========================================================================
    // Mode: architect family
    // =========================================================================
    static ref RE_DIRECTIVE: Regex = Regex::new(
        r"(?i)\b(build|design|plan|implement|create|define|structure|outline|draft|map out|set up|ship|deploy|refactor|organi[sz]e|list|give me|show me|generate|write|rank|compare)\b"
    ).unwrap();

    static ref RE_CONSTRAINT: Regex = Regex::new(
        r"(?i)\b(must|need to|needs to|required?|exactly|only|at least|at most|no more than|no less than|deadline|strictly|non-negotiable|by (monday|tuesday|wednesday|thursday|friday|tomorrow|tonight))\b"
    ).unwrap();

    static ref RE_ENUMERATION: Regex = Regex::new(
        r"(?im)^\s*(\d+[.)]|[-*])\s+|\b(firstly|secondly|thirdly|step\s+\d+|\d+\s+(steps|phases|options|items|points))\b"
    ).unwrap();

    static ref RE_TECHNICAL: Regex = Regex::new(
        r"(?i)\b(api|schema|database|pipeline|architecture|module|endpoint|system|framework|server|deployment|latency|algorithm|backend|frontend|config|configuration|integration)s?\b"
    ).unwrap();

    // =========================================================================
    // Mode: user family
    // =========================================================================
    static ref RE_UNCERTAINTY: Regex = Regex::new(
        r"(?i)\b(not sure|unsure|maybe|perhaps|i think|i guess|i don['’]?t know|idk|confused|no idea|not certain|kind of|sort of|i wonder|lost)\b"
    ).unwrap();

    static ref RE_EMOTION: Regex = Regex::new(
        r"(?i)\b(feel|feeling|felt|overwhelmed|anxious|sad|scared|afraid|frustrated|angry|lonely|tired|stressed|hurt|love|hate|upset|worried|excited|happy|miss)\b"
    ).unwrap();

    // =========================================================================
    // Intent
    // =========================================================================
    static ref RE_STABILIZE: Regex = Regex::new(
        r"(?i)\b(overwhelm|overwhelmed|overwhelming|stuck|panic|panicking|anxious|anxiety|can['’]?t cope|breaking down|falling apart|too much|stressed|exhausted|hopeless|burn(ed|t)? out|spiral(l)?ing|freaking out|drowning)\b"
    ).unwrap();

    static ref RE_CLARIFY: Regex = Regex::new(
        r"(?i)\b(how|why|explain|help|what does|what is|what['’]?s|meaning|clarify|understand|difference between)\b"
    ).unwrap();

    // =========================================================================
    // Confidence
    // =========================================================================
    static ref RE_RHETORICAL: Regex = Regex::new(
        r"(?i)(what['’]?s the point|who cares|does it (even )?matter|is that even|why bother|yeah right|\bas if\b)"
    ).unwrap();

    // =========================================================================
    // Latent desire (priority order: mastery, validation, curiosity, comfort)
    // =========================================================================
    static ref RE_MASTERY: Regex = Regex::new(
        r"(?i)\b(systems?|architecture|framework|infrastructure|pipeline|optimi[sz]e|scale|scaling|scalable|master|mastery|mastering|design pattern|blueprint|workflow)\b"
    ).unwrap();

    static ref RE_VALIDATION: Regex = Regex::new(
        r"(?i)\b(am i (good|enough|wrong|crazy|normal|doing (it |this )?(right|ok|okay|well))|was i (right|wrong)|did i do (it |this )?(right|well|ok|okay)|is it (ok|okay|normal) (that|to|if) i|do you think i['’]?m|be honest with me)\b"
    ).unwrap();

    static ref RE_CURIOSITY: Regex = Regex::new(
        r"(?i)\b(why|meaning|means|connect|connection|connected|connects|wonder|what if|how come|story behind|curious|origin)\b"
    ).unwrap();

    // Lane / action tokens
    static ref RE_CHART_TOKEN: Regex = Regex::new(
        r"(?i)^(top_?\d+|hot_?100|charts?|number_?1|no_?1|#1|billboard|rank(ing)?s?|year_?end|countdown)"
    ).unwrap();

    static ref RE_STORY_TOKEN: Regex = Regex::new(
        r"(?i)^(story|stories|custom_story|micro_?moments?|moments?|memory|memories|nostalgia|sweet_moments)"
    ).unwrap();

    // =========================================================================
    // Immersion
    // =========================================================================
    static ref RE_DEPTH_TEXT: Regex = Regex::new(
        r"(?i)\b(tell me more|go deeper|dig deeper|more about|what was it like|behind the|story of|remember when|take me back|what else)\b"
    ).unwrap();

    static ref RE_DEPTH_ACTION: Regex = Regex::new(
        r"(?i)^(deeper|more|story|custom_story|micro_?moments?|behind|expand|continue)"
    ).unwrap();

    static ref RE_ACCEPT_TEXT: Regex = Regex::new(
        r"(?i)^\s*(yes|yeah|yep|yup|sure|ok|okay|let['’]?s do (it|that)|sounds good|go on|please do|do it)\b"
    ).unwrap();

    static ref RE_ACCEPT_ACTION: Regex = Regex::new(
        r"(?i)^(accept|suggestion|chip|yes)"
    ).unwrap();

    static ref RE_VELVET_LANE: Regex = Regex::new(
        r"^(music|years|story|stories|moments|radio|top10|charts|nostalgia)$"
    ).unwrap();

    // =========================================================================
    // Novelty
    // =========================================================================
    static ref RE_MIXED_DOMAIN: Regex = Regex::new(
        r"(?i)\b(and also|but also|as well as|on the other hand|combined with|mixed with|at the same time|while also)\b"
    ).unwrap();

    static ref RE_PRONOUN: Regex = Regex::new(
        r"(?i)\b(it|this|that|they|them|those|these|he|she|him|her)\b"
    ).unwrap();

    static ref RE_QUESTION: Regex = Regex::new(
        r"\?|(?i:^\s*(what|how|why|which|who|where|when|can|could|should|is|are|do|does)\b)"
    ).unwrap();

    static ref RE_DIGITS: Regex = Regex::new(r"\d").unwrap();

    // =========================================================================
    // Risk
    // =========================================================================
    static ref RE_CRISIS: Regex = Regex::new(
        r"(?i)\b(kill myself|suicide|suicidal|self[- ]harm|hurt myself|end it all|want to die|can['’]?t go on|no reason to live)\b"
    ).unwrap();

    static ref STANDARD: Lexicon = Lexicon {
        directive: RE_DIRECTIVE.clone(),
        constraint: RE_CONSTRAINT.clone(),
        enumeration: RE_ENUMERATION.clone(),
        technical: RE_TECHNICAL.clone(),
        uncertainty: RE_UNCERTAINTY.clone(),
        emotion: RE_EMOTION.clone(),
        stabilize: RE_STABILIZE.clone(),
        clarify: RE_CLARIFY.clone(),
        rhetorical: RE_RHETORICAL.clone(),
        mastery: RE_MASTERY.clone(),
        validation: RE_VALIDATION.clone(),
        curiosity: RE_CURIOSITY.clone(),
        chart_token: RE_CHART_TOKEN.clone(),
        story_token: RE_STORY_TOKEN.clone(),
        depth_text: RE_DEPTH_TEXT.clone(),
        depth_action: RE_DEPTH_ACTION.clone(),
        accept_text: RE_ACCEPT_TEXT.clone(),
        accept_action: RE_ACCEPT_ACTION.clone(),
        velvet_lane: RE_VELVET_LANE.clone(),
        mixed_domain: RE_MIXED_DOMAIN.clone(),
        pronoun: RE_PRONOUN.clone(),
        question: RE_QUESTION.clone(),
        digits: RE_DIGITS.clone(),
        crisis: RE_CRISIS.clone(),
    };
}

/// Every pattern the mediation stages consult
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub directive: Regex,
    pub constraint: Regex,
    pub enumeration: Regex,
    pub technical: Regex,
    pub uncertainty: Regex,
    pub emotion: Regex,
    pub stabilize: Regex,
    pub clarify: Regex,
    pub rhetorical: Regex,
    pub mastery: Regex,
    pub validation: Regex,
    pub curiosity: Regex,
    /// Matched against lane/action tokens, not text
    pub chart_token: Regex,
    pub story_token: Regex,
    pub depth_text: Regex,
    pub depth_action: Regex,
    pub accept_text: Regex,
    pub accept_action: Regex,
    /// Lanes where immersion may start
    pub velvet_lane: Regex,
    pub mixed_domain: Regex,
    pub pronoun: Regex,
    pub question: Regex,
    pub digits: Regex,
    pub crisis: Regex,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

impl Lexicon {
    /// The built-in tables
    pub fn standard() -> Self {
        STANDARD.clone()
    }
}
