//! Pattern library for atomic fact extraction.
//!
//! Each category is an ordered set of case-insensitive regexes tuned to
//! apartment-marketing phrasing. Categories are iterated uniformly by the
//! extractor, so adding one is a data change, not a control-flow change.

use std::sync::LazyLock;

use adcraft_core::{AtomicSubtype, CampaignFocus};
use regex::Regex;

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// One extraction category: the subtype it emits and its pattern set.
pub(crate) struct CategoryPatterns {
    pub subtype: AtomicSubtype,
    pub patterns: Vec<Regex>,
}

pub(crate) static CATEGORY_PATTERNS: LazyLock<Vec<CategoryPatterns>> = LazyLock::new(|| {
    vec![
        CategoryPatterns {
            subtype: AtomicSubtype::Amenity,
            patterns: vec![
                rx(r"(?i)\b(?:resort[- ]style|sparkling|heated|saltwater|olympic[- ]size|beach[- ]entry)[\w -]{0,40}pool\b"),
                rx(r"(?i)\b(?:swimming|lap|plunge) pool\b"),
                rx(r"(?i)\b(?:(?:24[-/ ]?hour|state[- ]of[- ]the[- ]art|fully[- ]equipped|expansive) )?fitness (?:center|centre|studio)\b"),
                rx(r"(?i)\byoga (?:and spin )?studio\b"),
                rx(r"(?i)\b(?:resident|sky|rooftop) (?:clubhouse|lounge)(?: with [\w -]{3,30})?\b"),
                rx(r"(?i)\b(?:off[- ]leash )?(?:dog park|bark park|pet spa|pet wash(?:ing station)?)\b"),
                rx(r"(?i)\b(?:outdoor|poolside) (?:grilling stations?|fire pits?|kitchens?|loung(?:e|ing) areas?)\b"),
                rx(r"(?i)\b(?:covered|garage|reserved|gated) parking\b"),
                rx(r"(?i)\bpackage (?:lockers?|concierge)\b"),
                rx(r"(?i)\b(?:business|media|game) (?:center|room)s?\b"),
                rx(r"(?i)\b(?:rooftop|sky) (?:deck|terrace)s?\b"),
                rx(r"(?i)\b(?:community|children'?s) playground\b"),
                rx(r"(?i)\bcontrolled[- ]access entry\b"),
                rx(r"(?i)\bon[- ]site (?:maintenance|management|laundry)\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Feature,
            patterns: vec![
                rx(r"(?i)\bstainless[- ]steel appliances\b"),
                rx(r"(?i)\b(?:granite|quartz|marble) countertops\b"),
                rx(r"(?i)\b(?:hardwood|wood[- ]style|plank|luxury vinyl) floor(?:s|ing)\b"),
                rx(r"(?i)\bwalk[- ]in closets?\b"),
                rx(r"(?i)\bin[- ](?:unit|home) (?:washer(?: (?:and|&) dryer)?|laundry)\b"),
                rx(r"(?i)\bprivate (?:balcon(?:y|ies)|patios?|yards?)\b"),
                rx(r"(?i)\b(?:vaulted|nine[- ]foot|9[- ]foot|high) ceilings?\b"),
                rx(r"(?i)\bsmart[- ]home (?:features?|technology|locks?)\b"),
                rx(r"(?i)\b(?:energy[- ]efficient|double[- ]pane) (?:windows|appliances)\b"),
                rx(r"(?i)\bkitchen islands?\b"),
                rx(r"(?i)\b(?:soaking|garden) tubs?\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::FloorPlan,
            patterns: vec![
                rx(r"(?i)\b(?:studio|one|two|three|four|[1-4])[- ]bed(?:room)?s?(?: (?:and|&) (?:dens?|lofts?))?(?: (?:apartments?|homes?|floor ?plans?))?\b"),
                rx(r"(?i)\b(?:spacious|open[- ]concept) (?:studios?|lofts?|layouts?|floor ?plans?)\b"),
                rx(r"(?i)\b[\d,]{3,5} ?(?:sq\.? ?ft\.?|square feet)\b"),
                rx(r"(?i)\btownhome[- ]style (?:layouts?|residences?)\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Lifestyle,
            patterns: vec![
                rx(r"(?i)\b(?:luxury|resort[- ]style|upscale|maintenance[- ]free|carefree) living\b"),
                rx(r"(?i)\bpet[- ]friendly (?:community|living|apartments?)\b"),
                rx(r"(?i)\b(?:vibrant|active|welcoming) (?:community|neighborhood)\b"),
                rx(r"(?i)\blive,? work,? (?:and |& )?play\b"),
                rx(r"(?i)\bwork[- ]from[- ]home (?:friendly|ready|spaces?)\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Location,
            patterns: vec![
                rx(r"(?i)\b(?:just )?(?:minutes?|steps|blocks?) (?:from|to|away from) [\w' -]{3,45}"),
                rx(r"(?i)\b(?:close|convenient|walkable) to [\w' -]{3,45}"),
                rx(r"(?i)\bwalking distance (?:of|to|from) [\w' -]{3,45}"),
                rx(r"(?i)\b(?:in the heart of|located in|nestled in) [\w' -]{3,45}"),
                rx(r"(?i)\b(?:easy|quick|direct) access to [\w' -]{3,45}"),
                rx(r"(?i)\bnear (?:the )?[\w' -]{4,45}"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Special,
            patterns: vec![
                rx(r"(?i)\b(?:one|two|first|[12]) month'?s? (?:of )?free(?: rent)?[\w ,!-]{0,40}"),
                rx(r"(?i)\$[\d,]+ off[\w ,!-]{0,35}"),
                rx(r"(?i)\b(?:waived|no|zero) (?:application|admin(?:istration)?|deposit|security deposit) fees?[\w ,!-]{0,30}"),
                rx(r"(?i)\bmove[- ]in special[\w ,:!$-]{0,45}"),
                rx(r"(?i)\blimited[- ]time (?:offer|special)[\w ,:!$-]{0,45}"),
                rx(r"(?i)\blook (?:and|&) lease (?:special|today)[\w ,!$-]{0,30}"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Urgency,
            patterns: vec![
                rx(r"(?i)\bavailable (?:now|immediately|today)\b"),
                rx(r"(?i)\bimmediate (?:availability|move[- ]in|occupancy)\b"),
                rx(r"(?i)\bmove in (?:today|this (?:week|month))\b"),
                rx(r"(?i)\bnow (?:pre[- ])?leasing\b"),
                rx(r"(?i)\bonly (?:a few|\d+) (?:units?|homes?|apartments?) (?:left|remain(?:ing)?)\b"),
                rx(r"(?i)\blimited availability\b"),
                rx(r"(?i)\bwon'?t last long\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::CallToAction,
            patterns: vec![
                rx(r"(?i)\b(?:schedule|book) (?:a |your )?(?:tour|visit|showing)(?: today| now| online)?\b"),
                rx(r"(?i)\b(?:call|contact|visit) (?:us|our (?:leasing )?(?:office|team))(?: today| now)?\b"),
                rx(r"(?i)\bapply (?:online|now|today)\b"),
                rx(r"(?i)\bcome (?:see|tour) (?:us|your new home)(?: today)?\b"),
                rx(r"(?i)\b(?:stop|swing) by (?:today|for a tour)\b"),
            ],
        },
        CategoryPatterns {
            subtype: AtomicSubtype::Price,
            patterns: vec![
                rx(r"\$[\d,]+(?:\.\d{2})?\s*(?:-|–|—|to)\s*\$[\d,]+(?:\.\d{2})?(?:\s*(?:/|per )\s*mo(?:nth)?)?"),
                rx(r"(?i)\b(?:starting (?:at|from)|priced from|rents? from) \$[\d,]+(?:\.\d{2})?(?:\s*(?:/|per )\s*mo(?:nth)?)?"),
                rx(r"(?i)\baverage (?:rent|price)s? (?:of |around |near )?\$[\d,]+"),
                rx(r"(?i)\$[\d,]+(?:\.\d{2})?\s*(?:/|per )\s*month\b"),
            ],
        },
    ]
});

/// Generic community-name shapes: `<Name> Apartments`, `The <Name>`, and
/// `The <Name> at <Place>`. Deliberately case-sensitive — capitalization is
/// the signal.
pub(crate) static COMMUNITY_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        rx(r"\b(?:The )?[A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+){0,3} (?:Apartments|Apartment Homes|Residences|Community|Villas|Lofts|Flats|Townhomes)\b"),
        rx(r"\bThe [A-Z][a-z]+ (?:at|on) [A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+){0,2}\b"),
        rx(r"\bThe [A-Z][a-z]{3,}\b"),
    ]
});

/// Trailing expiry clause on a special offer, e.g. `expires March 31, 2026`
/// or `ends 3/31/26`.
pub(crate) static EXPIRY_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    rx(r"(?i)(?:expires?|ends?|valid (?:through|until)|through|until|by)\s+((?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.? \d{1,2}(?:st|nd|rd|th)?(?:,? \d{4})?|\d{1,2}/\d{1,2}(?:/\d{2,4})?)")
});

/// Price range shape — two dollar amounts joined by a dash or `to`.
pub(crate) static PRICE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| rx(r"\$[\d,]+(?:\.\d{2})?\s*(?:-|–|—|to)\s*\$[\d,]+"));

// ── Keyword tables ──────────────────────────────────────────────────────────

pub(crate) const PET_KEYWORDS: &[&str] = &["pet", "dog", "cat", "paw", "bark"];

pub(crate) const FITNESS_KEYWORDS: &[&str] =
    &["fitness", "gym", "yoga", "spin", "cardio", "weight", "wellness"];

pub(crate) const SOCIAL_KEYWORDS: &[&str] = &[
    "clubhouse", "lounge", "game", "media", "theater", "social", "coffee", "kitchen",
];

pub(crate) const CONVENIENCE_KEYWORDS: &[&str] = &[
    "parking", "package", "locker", "storage", "laundry", "business", "concierge",
    "maintenance", "management", "controlled", "wifi",
];

pub(crate) const TRANSIT_KEYWORDS: &[&str] = &[
    "highway", "freeway", "interstate", "metro", "transit", "rail", "station", "bus", "commute",
];

pub(crate) const PROXIMITY_KEYWORDS: &[&str] =
    &["minute", "step", "block", "walking", "close", "near", "away"];

/// Campaign-focus keyword sets, scored per narrative segment.
pub(crate) const FOCUS_KEYWORDS: &[(CampaignFocus, &[&str])] = &[
    (
        CampaignFocus::Luxury,
        &["luxury", "luxurious", "upscale", "elegant", "premium", "high-end", "sophisticated", "designer", "resort-style"],
    ),
    (
        CampaignFocus::Location,
        &["located", "location", "near", "nearby", "minutes", "downtown", "access", "convenient", "commute", "neighborhood"],
    ),
    (
        CampaignFocus::Amenities,
        &["pool", "fitness", "gym", "amenity", "amenities", "clubhouse", "grill", "playground", "dog park", "lounge"],
    ),
    (
        CampaignFocus::Value,
        &["affordable", "value", "special", "price", "priced", "rent", "save", "savings", "deal", "free", "discount"],
    ),
    (
        CampaignFocus::Lifestyle,
        &["community", "lifestyle", "living", "home", "comfort", "relax", "enjoy", "neighbors", "gather"],
    ),
];

/// Keyword clusters for narrative subtype classification, tested in priority
/// order (amenities → location → lifestyle).
pub(crate) const NARRATIVE_AMENITY_KEYWORDS: &[&str] = &[
    "pool", "fitness", "gym", "clubhouse", "amenit", "grill", "spa", "playground", "dog park",
];

pub(crate) const NARRATIVE_LOCATION_KEYWORDS: &[&str] = &[
    "located", "location", "minutes", "near", "downtown", "access", "neighborhood", "commute",
    "walking distance",
];

pub(crate) const NARRATIVE_LIFESTYLE_KEYWORDS: &[&str] = &[
    "lifestyle", "living", "relax", "enjoy", "comfort", "home", "entertain", "unwind",
];
