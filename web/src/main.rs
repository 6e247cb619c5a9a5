use dioxus::prelude::*;

use ui::components::AppNavbar;
use ui::views::Story;

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppNavbar writes the selected language here; Story re-renders on change.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Title { "Glucoscroll" }
        document::Style { "{THEME_CSS}" }

        AppNavbar {}
        Story {}
    }
}
