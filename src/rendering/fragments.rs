//! Embedded fragment templates and the renderer over them.

use crate::chat::domain::Message;
use crate::collaboration::services::{CollaborationSummary, ElementListView};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Element list fragment: one ordered list item per element, ascending by
/// position, with the reorder handle and the one-click toggle for tasks.
const ELEMENT_LIST_TEMPLATE: &str = r#"<section class="element-list" data-collaboration="{{ view.slug }}">
<header>
  <h2>{{ view.name }}</h2>
  <p class="progress">{{ view.task_completed }} of {{ view.task_total }} tasks done ({{ view.status }})</p>
</header>
<ol>
{%- for element in view.elements %}
  <li class="element element-{{ element.kind }}{% if element.completed %} completed{% endif %}"
      data-element="{{ element.id }}" data-position="{{ element.position }}">
    <span class="handle" draggable="true"></span>
    {%- if element.kind == "task" %}
    <form method="post" action="elements/{{ element.id }}/toggle">
      <input type="hidden" name="action" value="{% if element.completed %}undo{% else %}complete{% endif %}">
      <button type="submit" class="toggle">{% if element.completed %}&#10003;{% endif %}</button>
    </form>
    <span class="name">{{ element.name }}</span>
    {%- if element.completion_notes %}
    <p class="notes">{{ element.completion_notes }}</p>
    {%- endif %}
    {%- if element.attachment %}
    <a class="attachment" href="{{ element.attachment }}">attachment</a>
    {%- endif %}
    {%- else %}
    <span class="name">{{ element.name }}</span>
    <time datetime="{{ element.target_date }}">{{ element.target_date }}</time>
    {%- endif %}
  </li>
{%- endfor %}
</ol>
</section>"#;

/// Collaboration listing fragment: one card per collaboration with its
/// derived status and task progress.
const COLLABORATION_CARDS_TEMPLATE: &str = r#"<section class="collaboration-list">
{%- for collaboration in collaborations %}
  <article class="collaboration-card status-{{ collaboration.status }}">
    {%- if collaboration.image %}
    <img src="{{ collaboration.image }}" alt="">
    {%- endif %}
    <h3><a href="collaborations/{{ collaboration.slug }}">{{ collaboration.name }}</a></h3>
    <p>{{ collaboration.description }}</p>
    <p class="progress">{{ collaboration.task_completed }}/{{ collaboration.task_total }}</p>
  </article>
{%- endfor %}
</section>"#;

/// Message board fragment, newest first.
const MESSAGE_BOARD_TEMPLATE: &str = r#"<section class="board">
{%- for message in messages %}
  <article class="message" data-message="{{ message.id }}">
    <p>{{ message.body }}</p>
    <time datetime="{{ message.created_at }}">{{ message.created_at }}</time>
  </article>
{%- endfor %}
</section>"#;

/// Errors returned while rendering a fragment.
#[derive(Debug, Clone, Error)]
#[error("fragment render failed for '{fragment}': {reason}")]
pub struct RenderError {
    /// Name of the fragment that failed.
    pub fragment: String,
    /// Renderer-reported reason.
    pub reason: String,
}

/// Renders response fragments from service view types.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentRenderer;

impl FragmentRenderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders a collaboration's element list fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template cannot be rendered.
    pub fn element_list(&self, view: &ElementListView) -> Result<String, RenderError> {
        render("element_list", ELEMENT_LIST_TEMPLATE, Context { view })
    }

    /// Renders a group's collaboration card listing.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template cannot be rendered.
    pub fn collaboration_cards(
        &self,
        summaries: &[CollaborationSummary],
    ) -> Result<String, RenderError> {
        render(
            "collaboration_cards",
            COLLABORATION_CARDS_TEMPLATE,
            CardContext {
                collaborations: summaries,
            },
        )
    }

    /// Renders a board's message listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template cannot be rendered.
    pub fn message_board(&self, messages: &[Message]) -> Result<String, RenderError> {
        render("message_board", MESSAGE_BOARD_TEMPLATE, BoardContext { messages })
    }
}

#[derive(Serialize)]
struct Context<'a> {
    view: &'a ElementListView,
}

#[derive(Serialize)]
struct CardContext<'a> {
    collaborations: &'a [CollaborationSummary],
}

#[derive(Serialize)]
struct BoardContext<'a> {
    messages: &'a [Message],
}

fn render(
    fragment: &str,
    template: &str,
    context: impl Serialize,
) -> Result<String, RenderError> {
    let environment = Environment::new();
    environment
        .render_str(template, context)
        .map_err(|error| RenderError {
            fragment: fragment.to_owned(),
            reason: error.to_string(),
        })
}
