use maud::{html, Markup, DOCTYPE};

pub struct PageConfig<'a> {
    pub title: &'a str,
    /// Bible version the verse points were computed with
    pub version: &'a str,
}

pub fn base(config: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
            }
            body data-version=(config.version) {
                nav class="navbar is-primary" role="navigation" aria-label="main navigation" {
                    div class="navbar-brand" {
                        a class="navbar-item" href="/" {
                            strong { (config.title) }
                        }
                    }
                }

                section class="section pt-3" {
                    div class="container" {
                        div id="main-content" {
                            (content)
                        }
                    }
                }
            }
        }
    }
}
