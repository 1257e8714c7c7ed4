// Prompt Builder for property recommendations.
// The template and the candidate line format are kept stable so prompt
// snapshots in tests stay meaningful.

use crate::models::property::Property;

/// Sampling temperature for recommendation calls.
pub const RECOMMENDATION_TEMPERATURE: f32 = 0.5;

/// Upper bound on ids the model is asked for, and on ids the resolver keeps.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Recommendation prompt template.
/// Replace: {interests}, {candidate_count}, {candidates}, {max_recommendations}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"You are a travel agent.
You will be given a set of user interests as well as a detailed list of vacation property locations.
Each property location includes its id, name, city, state, and amenities.
Recommend the properties that best align with the user's interests.
Base your recommendation on the city of each property and the activities that are popular there.
Consider every property in the list, and spread your recommendations across different interests and locations.
Favor unusual destinations that are not too touristy.

USER INTERESTS: {interests}

PROPERTY LOCATIONS ({candidate_count}):
{candidates}

Respond with ONLY a JSON array of integers containing the recommended property ids, for example [3, 7].
Do not include anything else in your response: no prose, no markdown fences.
Do not repeat property ids.
Return no more than {max_recommendations} property ids."#;

const NO_INTERESTS: &str = "(none specified)";
const NO_CANDIDATES: &str = "(no properties available)";

/// The slice of a property the model is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub id: i64,
    pub name: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub amenities: &'a [String],
}

impl<'a> From<&'a Property> for Candidate<'a> {
    fn from(property: &'a Property) -> Self {
        Self {
            id: property.id,
            name: &property.name,
            city: &property.city,
            state: &property.state,
            amenities: &property.amenities,
        }
    }
}

/// Renders one candidate as a single prompt line.
///
/// `- id: 3 | name: Cozy Cabin | city: Denver | state: CO | amenities: wifi, kitchen`
pub fn candidate_line(candidate: &Candidate<'_>) -> String {
    let amenities = if candidate.amenities.is_empty() {
        "none".to_string()
    } else {
        candidate.amenities.join(", ")
    };
    format!(
        "- id: {} | name: {} | city: {} | state: {} | amenities: {}",
        candidate.id,
        one_line(candidate.name),
        one_line(candidate.city),
        one_line(candidate.state),
        one_line(&amenities)
    )
}

/// Builds the recommendation instruction for a user's interests and the full
/// candidate catalog. Either list may be empty.
pub fn build_prompt<S: AsRef<str>>(interests: &[S], candidates: &[Candidate<'_>]) -> String {
    let interests = if interests.is_empty() {
        NO_INTERESTS.to_string()
    } else {
        interests
            .iter()
            .map(|i| one_line(i.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let candidate_block = if candidates.is_empty() {
        NO_CANDIDATES.to_string()
    } else {
        candidates
            .iter()
            .map(candidate_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let candidate_count = candidates.len().to_string();
    let max_recommendations = MAX_RECOMMENDATIONS.to_string();
    let slots = [
        ("interests", interests.as_str()),
        ("candidate_count", candidate_count.as_str()),
        ("candidates", candidate_block.as_str()),
        ("max_recommendations", max_recommendations.as_str()),
    ];
    fill_template(RECOMMENDATION_PROMPT_TEMPLATE, &slots)
}

/// Fills `{name}` slots in a single pass over `template`. Substituted text is
/// never rescanned, so user-supplied values containing braces stay literal.
/// Unknown slots are left as they are.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let at_brace = &rest[open..];
        let filled = slots.iter().find_map(|&(name, value)| {
            let tail = at_brace.strip_prefix('{')?.strip_prefix(name)?;
            Some((value, tail.strip_prefix('}')?))
        });
        match filled {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = &at_brace[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Keeps free text from breaking the one-candidate-per-line layout.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
