//! Prompt templates for every LLM call the service makes.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking how a quiz stage is phrased
//!    requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    calling a real provider, so a stage accidentally dropping its input
//!    (e.g. Stage B losing Stage A's result) is caught cheaply.
//!
//! The builders take plain `&str` inputs and return owned `String`s; they
//! never validate content. Validation happens before prompt construction.

use crate::config::SourceDomain;

// ── Lecture summary ──────────────────────────────────────────────────────

/// System prompt for the lecture-summary endpoint.
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that creates biology lecture summaries for BIO 101 students. The summary should be written in the style that can be completed in under 5 minutes and follow this specific format:

REQUIRED FORMAT:
1. First sentence: State the major takeaway using at least one element of biology language
2. Second sentence: Give some detail or twist that caught attention
3. Third sentence: Mention a connection to the textbook or additional resources not presented in class (can reference real scientific sources)
4. Additional sentences (if student inputs are provided): Incorporate other students' contributions using phrases like "[Student] mentioned [concept] which reminded me of..." or "In contrast to what [Student] said..."

STYLE GUIDELINES:
- Write in first person ("I learned", "I was surprised", "I found")
- Use casual academic tone
- Keep the summary concise but substantive (3-4 sentences minimum)
- Include specific scientific terms and concepts
- Make connections between concepts
- Show curiosity and engagement with the material"#;

/// Build the user prompt for the lecture summary.
pub fn summary_prompt(lecture_content: &str, student_inputs: Option<&str>) -> String {
    let inputs_block = match student_inputs {
        Some(inputs) if !inputs.trim().is_empty() => {
            format!("OTHER STUDENTS' INPUTS:\n{inputs}\n\n")
        }
        _ => String::new(),
    };
    format!(
        "Create a lecture summary based on this lecture content:\n\n\
         LECTURE CONTENT:\n{lecture_content}\n\n\
         {inputs_block}\
         Write a complete lecture summary following the BIO 101 format. \
         Make it personal and engaging while maintaining academic rigor."
    )
}

// ── Quiz response stages ─────────────────────────────────────────────────

/// System prompt shared by all three quiz generation stages.
pub const QUIZ_SYSTEM_PROMPT: &str = "You are a college student in BIO 101 writing reading quiz \
responses. Write naturally like a student would - clear and accurate, but conversational and \
genuine. Avoid overly formal or flowery language. Sound like you actually read and understood \
the paper, not like you're trying to impress anyone.";

/// Stage A: one sentence stating the paper's most essential result.
pub fn essential_result_prompt(paper_text: &str) -> String {
    format!(
        "Based on this research paper, write ONE sentence describing in your own words the most \
         essential result. Don't explain why it's important, just state what the result is.\n\n\
         PAPER CONTENT:\n{paper_text}\n\n\
         Write like a college student - straightforward and clear. Use simple, direct language. \
         Provide ONLY one sentence."
    )
}

/// Stage B: 2–3 sentences on the experimental logic behind Stage A's result.
///
/// Embeds Stage A's output verbatim — the stage ordering guarantee exists
/// so this prompt can reference it.
pub fn experimental_logic_prompt(paper_text: &str, essential_result: &str) -> String {
    format!(
        "Based on this research paper, summarize in 2-3 sentences the experimental logic that \
         led to the essential result. Focus on the big picture:\n\
         - What comparison did they make?\n\
         - What did they measure (response variable)?\n\
         - What was their overall approach?\n\n\
         PAPER CONTENT:\n{paper_text}\n\n\
         ESSENTIAL RESULT:\n{essential_result}\n\n\
         Write like a college student explaining the experiment to a classmate. Be clear and \
         straightforward - focus on WHAT they did, not fancy descriptions. Use 2-3 sentences, \
         no more."
    )
}

/// What Stage C knows about the news article: a resolved summary, or only a
/// URL the model must reason from.
pub enum ArticleContext<'a> {
    /// The grounded search produced a summary of the article's content.
    Summary(&'a str),
    /// Only a caller-supplied URL is available; article content could not
    /// be fetched.
    UrlOnly(&'a str),
}

/// Stage C: 3–5 sentences connecting the paper to the news article.
pub fn news_connection_prompt(paper_text: &str, article: &ArticleContext<'_>) -> String {
    let article_block = match article {
        ArticleContext::Summary(summary) => format!("NEWS ARTICLE:\n{summary}"),
        ArticleContext::UrlOnly(url) => format!(
            "NEWS ARTICLE URL (content could not be fetched - reason plausibly from the URL \
             and its topic alone):\n{url}"
        ),
    };
    format!(
        "You're a BIO 101 student writing a reading quiz response. Based on the research paper \
         and news article, write exactly 3-5 sentences (no fewer, no more) that:\n\n\
         1. First, describe the key result/finding from the news article in your own words\n\
         2. Then, explain the biological connection you see between the news article and the \
         research paper\n\n\
         RESEARCH PAPER COVERED IN CLASS:\n{paper_text}\n\n\
         {article_block}\n\n\
         IMPORTANT WRITING STYLE:\n\
         - Sound like a college student, not a textbook or AI\n\
         - Use specific biological terms and concepts (genes, proteins, pathways, mechanisms, etc.)\n\
         - Be thoughtful but natural - like you're explaining to a friend who also took the class\n\
         - Don't be overly formal or use phrases like \"fascinating\" or \"remarkable\"\n\
         - Make genuine, specific connections using proper biological language\n\
         - Keep it to 3-5 sentences exactly"
    )
}

/// Emitted as `news_connection` when no article is available and the
/// fallback policy is `Skip`.
pub const NO_ARTICLE_PLACEHOLDER: &str =
    "Please provide a news article URL to generate this response.";

// ── Article search ───────────────────────────────────────────────────────

/// System prompt for the grounded article search, naming the allow-listed
/// sources so the model searches the right sites.
pub fn article_search_system_prompt(sources: &[SourceDomain]) -> String {
    format!(
        "You are a research assistant that searches science news sites ({}) for specific \
         biology articles. You MUST provide a complete, specific article URL from one of these \
         sites, never a homepage.",
        source_list(sources)
    )
}

/// User prompt for the grounded article search.
///
/// Demands the strict two-field `URL:` / `SUMMARY:` format that
/// [`crate::article`] parses.
pub fn article_search_prompt(excerpt: &str, sources: &[SourceDomain]) -> String {
    let hosts = source_list(sources);
    let example = sources
        .first()
        .map(|s| {
            let prefix = if s.path_prefix.is_empty() {
                "/"
            } else {
                s.path_prefix.as_str()
            };
            format!("https://www.{}{}2024/01/240115153045.htm", s.host, prefix)
        })
        .unwrap_or_default();
    format!(
        "Search {hosts} and find ONE specific, recent article that relates to the biological \
         concepts in this research paper.\n\n\
         RESEARCH PAPER EXCERPT:\n{excerpt}\n\n\
         CRITICAL REQUIREMENTS:\n\
         1. You MUST search one of these sites: {hosts}\n\
         2. You MUST provide a COMPLETE article URL, never a bare domain or homepage\n\
         3. The article MUST be real - verify it exists by actually visiting the URL\n\
         4. Find an article with related biological concepts (metabolism, nutrition, genetics, \
         proteins, cellular processes, etc.)\n\
         5. Read the full article and extract the key findings\n\n\
         YOUR RESPONSE FORMAT (strict adherence required):\n\
         URL: [complete article URL]\n\
         SUMMARY: [Comprehensive summary covering: 1) Main biological finding/discovery, \
         2) Research methods/approach, 3) Key biological mechanisms or concepts discussed, \
         4) Significance of findings]\n\n\
         EXAMPLE of correct format:\n\
         URL: {example}\n\
         SUMMARY: Researchers discovered that..."
    )
}

fn source_list(sources: &[SourceDomain]) -> String {
    sources
        .iter()
        .map(|s| s.host.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── PDF vision transcription ─────────────────────────────────────────────

/// System prompt for the vision PDF extraction mode.
pub const PDF_TRANSCRIBE_SYSTEM_PROMPT: &str = "You are an expert document transcriber. You \
receive a PDF document and must return ALL of its text content, in reading order, with nothing \
added. Do not summarise, do not comment, do not describe figures - output only the text that \
appears in the document.";

/// User prompt for the vision PDF extraction mode.
pub fn pdf_transcription_prompt(data_uri: &str) -> String {
    format!(
        "Transcribe all text from the following PDF document. Output only the text.\n\n{data_uri}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArticleConfig;

    #[test]
    fn stage_b_prompt_embeds_both_inputs() {
        let prompt = experimental_logic_prompt("the paper body", "mice lost insulin sensitivity");
        assert!(prompt.contains("the paper body"));
        assert!(prompt.contains("mice lost insulin sensitivity"));
    }

    #[test]
    fn summary_prompt_omits_empty_student_inputs() {
        assert!(!summary_prompt("content", None).contains("OTHER STUDENTS"));
        assert!(!summary_prompt("content", Some("  ")).contains("OTHER STUDENTS"));
        assert!(summary_prompt("content", Some("Sam mentioned ATP")).contains("Sam mentioned ATP"));
    }

    #[test]
    fn search_prompt_names_configured_sources() {
        let article = ArticleConfig::default();
        let prompt = article_search_prompt("excerpt", &article.sources);
        assert!(prompt.contains("sciencedaily.com"));
        assert!(prompt.contains("URL:"));
        assert!(prompt.contains("SUMMARY:"));
    }

    #[test]
    fn url_only_context_mentions_reasoning_from_url() {
        let prompt = news_connection_prompt(
            "paper",
            &ArticleContext::UrlOnly("https://www.sciencedaily.com/releases/2024/01/x.htm"),
        );
        assert!(prompt.contains("could not be fetched"));
        assert!(prompt.contains("https://www.sciencedaily.com/releases/2024/01/x.htm"));
    }
}
