// src/carrinho/carrinho_service.rs

use bigdecimal::BigDecimal;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};

use super::carrinho_structs::{CarrinhoView, ItemCarrinho, ItemCarrinhoView};
use crate::shared::erros::ErroLoja;

/// Colunas do produto que interessam ao carrinho.
#[derive(FromRow)]
struct ProdutoResumo {
    nome: String,
    estoque: i32,
}

async fn buscar_produto(pool: &PgPool, produto_id: i32) -> Result<ProdutoResumo, ErroLoja> {
    query_as::<_, ProdutoResumo>("SELECT nome, estoque FROM produtos WHERE id = $1")
        .bind(produto_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErroLoja::ProdutoNaoEncontrado)
}

/// Retorna o ID do carrinho do usuário, se ele já existir.
async fn id_do_carrinho(pool: &PgPool, usuario_id: i32) -> Result<Option<i32>, ErroLoja> {
    let id = query_scalar::<_, i32>("SELECT id FROM carrinhos WHERE usuario_id = $1")
        .bind(usuario_id)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Resolve o carrinho do usuário, criando um vazio na primeira utilização.
/// Falha com `UsuarioNaoEncontrado` se o próprio usuário não existir.
async fn resolver_ou_criar_carrinho(pool: &PgPool, usuario_id: i32) -> Result<i32, ErroLoja> {
    if let Some(id) = id_do_carrinho(pool, usuario_id).await? {
        return Ok(id);
    }

    let usuario_existe = query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM usuarios WHERE id = $1)")
        .bind(usuario_id)
        .fetch_one(pool)
        .await?;
    if !usuario_existe {
        return Err(ErroLoja::UsuarioNaoEncontrado);
    }

    // ON CONFLICT cobre a corrida entre duas primeiras requisições do mesmo
    // usuário: ambas terminam com o mesmo carrinho.
    let id = query_scalar::<_, i32>(
        "INSERT INTO carrinhos (usuario_id) VALUES ($1) \
         ON CONFLICT (usuario_id) DO UPDATE SET usuario_id = EXCLUDED.usuario_id \
         RETURNING id",
    )
    .bind(usuario_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Monta a visão do carrinho com os itens resolvidos e o preço total
/// recalculado a partir do preço atual de cada produto.
async fn montar_visao(pool: &PgPool, carrinho_id: i32, usuario_id: i32) -> Result<CarrinhoView, ErroLoja> {
    let itens = query_as::<_, ItemCarrinhoView>(
        "SELECT ci.produto_id, p.nome, p.preco, ci.quantidade \
         FROM carrinho_itens ci \
         JOIN produtos p ON p.id = ci.produto_id \
         WHERE ci.carrinho_id = $1 \
         ORDER BY ci.id",
    )
    .bind(carrinho_id)
    .fetch_all(pool)
    .await?;

    let mut preco_total = BigDecimal::from(0);
    for item in &itens {
        let quantidade = BigDecimal::from(item.quantidade);
        preco_total += &item.preco * &quantidade;
    }

    Ok(CarrinhoView {
        id: carrinho_id,
        usuario_id,
        itens,
        preco_total,
    })
}

/// Busca o carrinho do usuário com seus itens e o preço total.
/// Cria um carrinho vazio na primeira chamada (inicialização preguiçosa).
pub async fn buscar_carrinho(pool: &PgPool, usuario_id: i32) -> Result<CarrinhoView, ErroLoja> {
    let carrinho_id = resolver_ou_criar_carrinho(pool, usuario_id).await?;
    montar_visao(pool, carrinho_id, usuario_id).await
}

/// Adiciona um produto ao carrinho do usuário, somando à quantidade já
/// presente quando o item existe.
///
/// A validação de estoque compara a quantidade total desejada (existente +
/// solicitada) com o estoque atual do produto. Esta checagem é otimista:
/// nenhuma reserva é feita, e o ponto autoritativo de consumo de estoque é o
/// fechamento da venda.
pub async fn adicionar_item(
    pool: &PgPool,
    usuario_id: i32,
    produto_id: i32,
    quantidade: i32,
) -> Result<CarrinhoView, ErroLoja> {
    if quantidade <= 0 {
        return Err(ErroLoja::QuantidadeInvalida);
    }

    let carrinho_id = resolver_ou_criar_carrinho(pool, usuario_id).await?;
    let produto = buscar_produto(pool, produto_id).await?;

    // Verifica se o produto já está no carrinho
    let existente = query_scalar::<_, i32>(
        "SELECT quantidade FROM carrinho_itens WHERE carrinho_id = $1 AND produto_id = $2",
    )
    .bind(carrinho_id)
    .bind(produto_id)
    .fetch_optional(pool)
    .await?;

    match existente {
        Some(atual) => {
            let nova_quantidade = atual + quantidade;
            if produto.estoque < nova_quantidade {
                return Err(ErroLoja::EstoqueInsuficiente {
                    produto: produto.nome,
                    disponivel: produto.estoque,
                    solicitado: nova_quantidade,
                });
            }
            query("UPDATE carrinho_itens SET quantidade = $1 WHERE carrinho_id = $2 AND produto_id = $3")
                .bind(nova_quantidade)
                .bind(carrinho_id)
                .bind(produto_id)
                .execute(pool)
                .await?;
        }
        None => {
            if produto.estoque < quantidade {
                return Err(ErroLoja::EstoqueInsuficiente {
                    produto: produto.nome,
                    disponivel: produto.estoque,
                    solicitado: quantidade,
                });
            }
            query("INSERT INTO carrinho_itens (carrinho_id, produto_id, quantidade) VALUES ($1, $2, $3)")
                .bind(carrinho_id)
                .bind(produto_id)
                .bind(quantidade)
                .execute(pool)
                .await?;
        }
    }

    montar_visao(pool, carrinho_id, usuario_id).await
}

/// Sobrescreve a quantidade de um item já presente no carrinho.
/// Quantidade zero ou negativa equivale a remover o item. Esta operação
/// nunca cria um item novo; para isso existe `adicionar_item`.
pub async fn atualizar_quantidade(
    pool: &PgPool,
    usuario_id: i32,
    produto_id: i32,
    quantidade: i32,
) -> Result<CarrinhoView, ErroLoja> {
    if quantidade <= 0 {
        // Quantidade não positiva remove o produto do carrinho
        return remover_item(pool, usuario_id, produto_id).await;
    }

    let carrinho_id = id_do_carrinho(pool, usuario_id)
        .await?
        .ok_or(ErroLoja::CarrinhoNaoEncontrado)?;

    let produto = buscar_produto(pool, produto_id).await?;
    if produto.estoque < quantidade {
        return Err(ErroLoja::EstoqueInsuficiente {
            produto: produto.nome,
            disponivel: produto.estoque,
            solicitado: quantidade,
        });
    }

    let result = query("UPDATE carrinho_itens SET quantidade = $1 WHERE carrinho_id = $2 AND produto_id = $3")
        .bind(quantidade)
        .bind(carrinho_id)
        .bind(produto_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ErroLoja::ItemNaoEncontrado);
    }

    montar_visao(pool, carrinho_id, usuario_id).await
}

/// Remove um produto do carrinho do usuário.
pub async fn remover_item(
    pool: &PgPool,
    usuario_id: i32,
    produto_id: i32,
) -> Result<CarrinhoView, ErroLoja> {
    let carrinho_id = id_do_carrinho(pool, usuario_id)
        .await?
        .ok_or(ErroLoja::CarrinhoNaoEncontrado)?;

    // O produto precisa existir mesmo para remoção, espelhando a validação
    // das demais operações.
    buscar_produto(pool, produto_id).await?;

    let result = query("DELETE FROM carrinho_itens WHERE carrinho_id = $1 AND produto_id = $2")
        .bind(carrinho_id)
        .bind(produto_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ErroLoja::ItemNaoEncontrado);
    }

    montar_visao(pool, carrinho_id, usuario_id).await
}

/// Substitui todo o conteúdo do carrinho pela lista enviada, em uma única
/// transação (apaga tudo e insere os novos itens). Não há validação de
/// estoque por item neste caminho: a lista é o estado confiado do cliente.
/// Se qualquer passo falhar, nenhuma substituição parcial fica visível.
pub async fn sincronizar_carrinho(
    pool: &PgPool,
    usuario_id: i32,
    itens: &[ItemCarrinho],
) -> Result<CarrinhoView, ErroLoja> {
    let carrinho_id = id_do_carrinho(pool, usuario_id)
        .await?
        .ok_or(ErroLoja::CarrinhoNaoEncontrado)?;

    let mut transaction = pool.begin().await?;

    // 1. Apaga todos os itens atuais do carrinho
    query("DELETE FROM carrinho_itens WHERE carrinho_id = $1")
        .bind(carrinho_id)
        .execute(&mut *transaction)
        .await?;

    // 2. Insere os novos itens com suas quantidades
    for item in itens {
        query("INSERT INTO carrinho_itens (carrinho_id, produto_id, quantidade) VALUES ($1, $2, $3)")
            .bind(carrinho_id)
            .bind(item.produto_id)
            .bind(item.quantidade)
            .execute(&mut *transaction)
            .await?;
    }

    // Qualquer erro acima descarta a transação e o conteúdo antigo permanece.
    transaction.commit().await?;

    montar_visao(pool, carrinho_id, usuario_id).await
}
