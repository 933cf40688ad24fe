// LLM prompt constants for JD summarization.

/// System prompt for JD summarization. Enforces JSON-only output.
pub const JD_SUMMARY_SYSTEM: &str = "You are an expert recruiter and job description analyst. \
    Summarize a job description into structured requirements used to screen candidate CVs. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// JD summarization prompt template. Replace `{jd_text}` before sending.
pub const JD_SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the following job description for candidate screening.

Return a JSON object with this EXACT schema (no extra fields):
{
  "hard_requirements": [
    {"text": "5+ years Rust programming", "is_required": true}
  ],
  "soft_signals": [
    "Kubernetes experience a plus"
  ],
  "role_signals": {
    "is_startup": false,
    "is_ic_focused": true,
    "is_research": false,
    "seniority": "senior"
  },
  "keyword_inventory": [
    {
      "keyword": "Rust",
      "frequency": 5,
      "position_weight": 0.8,
      "weighted_score": 4.0
    }
  ],
  "detected_tone": "CollaborativeEnterprise"
}

Rules:

POSITION WEIGHTS for keyword scoring:
- Title / header: 1.0
- Requirements section ("Required:", "Must have:", "You need:"): 0.8
- Responsibilities section ("You will:", "Responsibilities:"): 0.6
- About Us / company section: 0.3
weighted_score = frequency * position_weight

TONE OPTIONS (pick exactly one):
- "AggressiveStartup": "own", "drive", "move fast", "spearhead", "disrupt"
- "CollaborativeEnterprise": "partner", "collaborate", "contribute", "support teams"
- "ResearchOriented": "investigate", "publish", "evaluate", "propose"
- "ProductOriented": "ship", "launch", "deliver", "improve user experience"

HARD REQUIREMENTS: explicit must-haves such as "required", "must have", minimum years.
SOFT SIGNALS: nice-to-haves such as "preferred", "bonus", "nice to have", "plus".
SENIORITY: "junior", "mid", "senior", "staff", "principal", "director", or "unknown".

Keywords are matched literally against candidate CVs: prefer the exact spelling a CV would use
(e.g. "Kubernetes", "PostgreSQL", "distributed systems"), one concept per keyword.

JOB DESCRIPTION:
{jd_text}"#;
