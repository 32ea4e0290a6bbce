/// Fixed instruction template sent with every scan.
const GUIDANCE: &str = "\
You are assisting a blind person who is navigating their surroundings. \
Analyze the attached images of their environment and describe the scene from \
their perspective, focusing on what matters for safe movement: obstacles in \
their path such as chairs, steps, uneven ground or objects on the floor; \
clear pathways and directions they can take; hazards like drop-offs or \
overhanging objects; and the general layout of the immediate area in terms \
that are easy to follow by audio alone. Answer in two or three short, \
actionable sentences, starting with an overview and ending with a direction \
or warning. The camera image is mirrored, so keep that in mind when saying \
left or right.";

/// Build the describe prompt: the guidance template plus the user's question,
/// when one was asked.
pub fn guidance_prompt(question: Option<&str>) -> String {
    match question {
        Some(question) if !question.trim().is_empty() => format!(
            "{GUIDANCE}\n\nUser's question: '{}'\nBased on the latest images, \
             give the best possible guidance to help them move safely and find \
             what they need.",
            question.trim()
        ),
        _ => GUIDANCE.to_string(),
    }
}
