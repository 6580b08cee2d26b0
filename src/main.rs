#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let _rocket = placeload::rocket().launch().await?;
    Ok(())
}
