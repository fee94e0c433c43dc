//! Prompt composition and deterministic seed derivation for the OCEAN
//! assessment call.

use sha2::{Digest, Sha256};

use crate::analysis::models::InterviewType;

/// Fixed system instruction describing the 5 domains, their 30 named
/// facets, the 1-5 rubric, evidence requirements, and the exact JSON
/// output shape. Versioned as a whole — edits change scoring behavior.
pub const OCEAN_SYSTEM_PROMPT: &str = r#"You are an expert industrial-organizational psychologist specializing in Big Five (OCEAN) personality assessment from interview transcripts.

Your task: Analyze interview transcripts and score the candidate on the Big Five personality dimensions using the Johnson 120 IPIP-NEO-PI-R framework.

## Big Five Domains & Facets

**O - Openness to Experience**
1. Imagination (fantasy-oriented vs practical)
2. Artistic Interests (appreciates art/beauty vs indifferent)
3. Emotionality (aware of feelings vs unaware)
4. Adventurousness (tries new things vs routine-oriented)
5. Intellect (enjoys abstract ideas vs concrete thinking)
6. Liberalism (challenges authority vs traditional values)

**C - Conscientiousness**
1. Self-Efficacy (confident in abilities vs doubts capabilities)
2. Orderliness (organized vs disorganized)
3. Dutifulness (follows rules vs casual about obligations)
4. Achievement-Striving (ambitious vs content with status quo)
5. Self-Discipline (finishes tasks vs procrastinates)
6. Cautiousness (thinks before acting vs impulsive)

**E - Extraversion**
1. Friendliness (warm and approachable vs reserved)
2. Gregariousness (sociable vs prefers solitude)
3. Assertiveness (takes charge vs stays in background)
4. Activity Level (fast-paced vs leisurely)
5. Excitement-Seeking (craves excitement vs prefers calm)
6. Cheerfulness (joyful and optimistic vs serious)

**A - Agreeableness**
1. Trust (believes in others vs suspicious)
2. Morality (straightforward vs manipulative)
3. Altruism (helps others vs self-focused)
4. Cooperation (defers to others vs competitive)
5. Modesty (humble vs proud of achievements)
6. Sympathy (soft-hearted vs tough-minded)

**N - Neuroticism**
1. Anxiety (worries frequently vs calm)
2. Anger (irritable vs even-tempered)
3. Depression (feels sad/discouraged vs content)
4. Self-Consciousness (shy in social situations vs confident)
5. Immoderation (resists temptation poorly vs disciplined with desires)
6. Vulnerability (handles stress poorly vs pressure-proof)

## Scoring Instructions

For each of the 30 facets, assign a score from 1-5:
- **1** = Very Low (strong opposite trait evident)
- **2** = Low (somewhat opposite trait)
- **3** = Moderate/Neutral (average or insufficient evidence)
- **4** = High (trait somewhat characteristic)
- **5** = Very High (trait strongly characteristic)

## Evidence Requirements

For each domain (O, C, E, A, N), provide 2-3 pieces of evidence:
- Direct quotes from the transcript
- Clear reasoning connecting the quote to the specific facet
- Confidence score (0-1) for each piece of evidence

## Output Format

Return a valid JSON object with:
1. **scores**: Numeric ratings for all 30 facets organized by domain
2. **evidence**: 10-15 specific transcript quotes supporting key findings
3. **confidence**: Overall confidence level (0-1) in the assessment
4. **reasoning**: Brief summary of key behavioral patterns observed

## Guidelines

- Base ratings ONLY on observable behaviors and statements in the transcript
- Look for patterns across multiple statements, not single instances
- Consider interview context (technical interviews may not show full personality range)
- If insufficient evidence exists for a facet, score it 3 (neutral) and note low confidence
- Cite specific, relevant quotes as evidence
- Be objective and avoid bias based on job performance or technical skills
- Focus on HOW the person communicates and behaves, not WHAT they accomplished
"#;

/// Literal example of the required output shape, embedded in every user
/// prompt so the model's JSON format is unambiguous.
const OUTPUT_EXAMPLE: &str = r#"{
  "scores": {
    "O": { "facets": { "1": 4, "2": 3, "3": 4, "4": 3, "5": 5, "6": 3 } },
    "C": { "facets": { "1": 4, "2": 3, "3": 4, "4": 5, "5": 4, "6": 4 } },
    "E": { "facets": { "1": 3, "2": 2, "3": 4, "4": 3, "5": 2, "6": 3 } },
    "A": { "facets": { "1": 4, "2": 4, "3": 3, "4": 3, "5": 3, "6": 4 } },
    "N": { "facets": { "1": 2, "2": 2, "3": 2, "4": 3, "5": 3, "6": 2 } }
  },
  "evidence": [
    {
      "domain": "O",
      "facet": 5,
      "quote": "Direct quote from transcript that demonstrates the trait",
      "reasoning": "Explanation of why this quote demonstrates high/low score on this specific facet",
      "confidence": 0.9
    }
  ],
  "confidence": 0.78,
  "reasoning": "Overall summary of the personality profile and key observations. Note any limitations due to interview format or insufficient evidence for certain domains."
}"#;

/// Builds the per-request user instruction: transcript verbatim, optional
/// job-role / interview-type context lines, and the literal JSON example.
pub fn build_user_prompt(
    transcript: &str,
    job_role: Option<&str>,
    interview_type: Option<InterviewType>,
) -> String {
    let context_info = if job_role.is_some() || interview_type.is_some() {
        format!(
            "\n## Interview Context\n- Job Role: {}\n- Interview Type: {}\n",
            job_role.unwrap_or("Not specified"),
            interview_type.map(|t| t.as_str()).unwrap_or("General"),
        )
    } else {
        String::new()
    };

    format!(
        "Analyze this interview transcript and provide Big Five personality assessment.\n\
        {context_info}\n\
        ## Transcript\n\n\
        {transcript}\n\n\
        ## Required Output\n\n\
        Provide a JSON object with this exact structure (do not include any markdown formatting, just pure JSON):\n\n\
        {OUTPUT_EXAMPLE}\n\n\
        Important: Provide 10-15 evidence items covering all 5 domains. Analyze thoroughly and provide detailed, specific evidence."
    )
}

/// Derives the sampling seed from transcript content: SHA-256 digest,
/// first 8 hex digits as an unsigned integer, reduced mod 1,000,000.
/// Identical text always yields the identical seed, so re-running the
/// same transcript requests the same sampling from the model.
pub fn derive_seed(transcript: &str) -> u64 {
    let digest = Sha256::digest(transcript.as_bytes());
    // The first 8 hex characters of the digest are its first 4 bytes.
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    u64::from(prefix) % 1_000_000
}
