//! Question input form.
//!
//! The textarea auto-grows up to 200px and submits on Enter without Shift;
//! Alpine owns the transient value. The box clears when the request is
//! handed off, not when the response arrives.

pub(super) fn question_form(session_id: &str) -> String {
    format!(
        r##"<div class="ask-area">
        <form class="ask-form" hx-post="/ask" hx-target="#workspace" hx-swap="innerHTML"
              hx-indicator="#thinking" hx-on--before-request="this.reset()"
              x-data="{{ question: '' }}">
            <input type="hidden" name="session_id" value="{session_id}">
            <textarea
                name="question"
                placeholder="Type your question here (e.g. How does quantum entanglement work?)"
                rows="1"
                x-model="question"
                x-on:keydown.enter.prevent="if (!$event.shiftKey && question.trim()) {{ $el.form.requestSubmit() }}"
                x-on:input="$el.style.height = 'auto'; $el.style.height = Math.min($el.scrollHeight, 200) + 'px'"
                required></textarea>
            <button type="submit" class="ask-submit" x-bind:disabled="!question.trim()">Ask</button>
        </form>
        <p class="ask-hint">Press Enter to send, Shift+Enter for new line</p>
    </div>"##
    )
}
