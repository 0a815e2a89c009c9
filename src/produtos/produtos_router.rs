// src/produtos/produtos_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, Row};

// Importa as structs definidas no módulo `produtos_structs`
use super::produtos_structs::{FiltroProdutos, NovoProduto, Produto};
use crate::shared::erros::ErroLoja;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

const COLUNAS_PRODUTO: &str =
    "id, nome, descricao, preco, estoque, categoria_id, imagem_url, destaque";

/// Rota para buscar todos os produtos, com filtro opcional por categoria
/// e por destaque.
#[get("/produtos")]
pub async fn buscar_produtos(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroProdutos>,
) -> Result<HttpResponse, ErroLoja> {
    let sql = format!(
        "SELECT {} FROM produtos \
         WHERE ($1::int4 IS NULL OR categoria_id = $1) \
           AND ($2::bool IS NULL OR destaque = $2) \
         ORDER BY id",
        COLUNAS_PRODUTO
    );

    let produtos = query_as::<_, Produto>(&sql)
        .bind(filtro.categoria_id)
        .bind(filtro.destaque)
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(produtos))
}

/// Rota para buscar um produto pelo seu ID.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    let id = path.into_inner();
    let sql = format!("SELECT {} FROM produtos WHERE id = $1", COLUNAS_PRODUTO);
    let produto = query_as::<_, Produto>(&sql)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or(ErroLoja::ProdutoNaoEncontrado)?;

    Ok(HttpResponse::Ok().json(produto))
}

/// Rota para inserir um novo produto no banco de dados. Apenas administradores.
#[post("/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovoProduto>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let row = query(
        "INSERT INTO produtos (nome, descricao, preco, estoque, categoria_id, imagem_url, destaque) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(&item.nome)
    .bind(&item.descricao)
    .bind(&item.preco)
    .bind(item.estoque)
    .bind(item.categoria_id)
    .bind(&item.imagem_url)
    .bind(item.destaque)
    .fetch_one(&data.db_pool)
    .await?;

    let id: i32 = row.try_get("id").map_err(ErroLoja::Banco)?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Produto cadastrado com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}

/// Rota para atualizar um produto existente. Apenas administradores.
#[put("/produtos/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovoProduto>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let id = path.into_inner();
    let result = query(
        "UPDATE produtos SET nome = $1, descricao = $2, preco = $3, estoque = $4, \
         categoria_id = $5, imagem_url = $6, destaque = $7 WHERE id = $8",
    )
    .bind(&item.nome)
    .bind(&item.descricao)
    .bind(&item.preco)
    .bind(item.estoque)
    .bind(item.categoria_id)
    .bind(&item.imagem_url)
    .bind(item.destaque)
    .bind(id)
    .execute(&data.db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ErroLoja::ProdutoNaoEncontrado);
    }

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Produto atualizado com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}

/// Rota para deletar um produto. Apenas administradores.
#[delete("/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let id = path.into_inner();
    let result = query("DELETE FROM produtos WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ErroLoja::ProdutoNaoEncontrado);
    }

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Produto removido com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}
