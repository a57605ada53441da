//! Configuration page markup.

use nodeconf_core::html::escape;
use nodeconf_core::ConfigStore;

/// Wrap the rendered fields in a complete HTML page with a POST form.
pub fn config_page(store: &ConfigStore) -> String {
    let hostname = store.get::<String>("hostname").unwrap_or_default();
    let title = if hostname.is_empty() {
        "Node configuration".to_string()
    } else {
        format!("{} configuration", escape(&hostname))
    };

    format!(
        "<!doctype html>\n\
         <html>\n\
         <head>\n\
         <meta charset='utf-8'>\n\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <form method='post' action='/config'>\n\
         {fields}\
         <input type='submit' value='Save'>\n\
         </form>\n\
         </body>\n\
         </html>\n",
        title = title,
        fields = store.render_form(),
    )
}
