//! List every post known to the CMS

use anyhow::Result;

use crate::cms::CmsClient;
use crate::content::PostList;
use crate::helpers::display_date;
use crate::Comet;

/// Follow pagination cursors to exhaustion and print all posts
pub async fn run(comet: &Comet) -> Result<()> {
    if comet.config.api.endpoint.is_empty() {
        anyhow::bail!("api.endpoint is not configured; set it in _config.yml");
    }

    let client = CmsClient::connect(&comet.config.api).await?;
    let doc_type = client.document_type();

    let fields = [
        format!("{}.title", doc_type),
        format!("{}.author", doc_type),
    ];
    let fields: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();

    let response = client
        .query()
        .at("document.type", doc_type)
        .fetch(&fields)
        .page_size(comet.config.pagination.per_page)
        .orderings("[document.first_publication_date desc]")
        .send()
        .await?;

    let mut list = PostList::from_response(&response);
    while list.load_more(&client).await? {}

    println!("Posts ({}):", list.results.len());
    for post in &list.results {
        println!(
            "  {} - {} [{}]",
            display_date(
                post.first_publication_date.as_ref(),
                &comet.config.language
            ),
            post.title,
            post.uid
        );
    }

    Ok(())
}
