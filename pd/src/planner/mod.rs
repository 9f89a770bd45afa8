//! Day planning agent
//!
//! A multi-turn conversation: the model locates the user, checks the weather
//! there, and answers with activity recommendations for the day.

mod agent;
mod prompt;

pub use agent::{AgentError, AgentRun, PlannerAgent};
pub use prompt::{PromptContext, render_instructions};

/// Default system instructions; `{{today}}` is replaced with the current date
pub const DEFAULT_INSTRUCTIONS: &str = "Ви розумний асистент з планування дня, який дає рекомендації на основі погодних умов. \
Сьогодні {{today}}. \
Будьте лаконічними, відповідайте одним-двома реченнями. \
Використовуйте `get_user_location_by_ip` для отримання координат локації, \
потім `get_weather` для отримання погоди, \
і на основі цієї інформації рекомендуйте оптимальні активності для дня. \
Якщо погода гарна, пропонуйте більше заходів на відкритому повітрі. \
При поганій погоді, пропонуйте активності в приміщенні. \
Враховуйте температуру та опади при плануванні фізичних активностей.";

/// Default user request for `pd plan`
pub const DEFAULT_PROMPT: &str = "Допоможи мені спланувати день згідно мого місцезнаходження";
