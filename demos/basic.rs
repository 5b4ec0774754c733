use cypher_rows::{flatten3, get, CypherClient, Statement};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let db = CypherClient::from_env().map_err(anyhow::Error::msg)?;

    db.execute(
        Statement::new("CREATE (:Person {name: {name}, age: {age}})")
            .on("name", "Kit")
            .on("age", 42),
    )
    .await?;

    let people = get::<String>("name")
        .and(get::<i32>("age"))
        .and(get::<Option<String>>("city"))
        .map(flatten3)
        .many();

    let rows = db
        .query_as(
            "MATCH (p:Person) RETURN p.name AS name, p.age AS age, p.city AS city",
            &people,
        )
        .await?;

    for (name, age, city) in rows {
        println!("{name} ({age}) lives in {}", city.as_deref().unwrap_or("?"));
    }

    Ok(())
}
